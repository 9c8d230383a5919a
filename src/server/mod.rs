//! HTTP API serving the dashboard.
//!
//! Read-only JSON routes over the [`DataGateway`]. The dashboard is often
//! served from another origin during development, so CORS is permissive
//! unless disabled in config.

pub mod api;

use crate::config::ServerConfig;
use crate::gateway::DataGateway;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<DataGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<DataGateway>) -> Self {
        Self { gateway }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let api = Router::new()
        .route("/metas", get(api::get_metas))
        .route("/metas/filters", get(api::get_filter_options))
        .route("/metrics/global", get(api::get_global_metrics))
        .route("/metrics/programs", get(api::get_program_performance))
        .route("/metrics/evaluations", get(api::get_evaluation_distribution));

    let router = Router::new()
        .nest("/api", api)
        .route("/health", get(api::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, gateway: Arc<DataGateway>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let app = build_router(AppState::new(gateway), config.cors);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
