//! Route handlers.
//!
//! Every data route answers `{ "success": true, "data": ... }`, or HTTP 500
//! with `{ "success": false, "error": "..." }` when the dataset could not
//! be loaded.

use super::AppState;
use crate::analysis::{evaluation_distribution, filter::distinct_values, MetaFilter};
use crate::gateway::GatewayError;
use crate::models::{EvaluationDistribution, GlobalMetrics, Meta, Metadata, ProgramPerformance};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Number of records returned when a filter was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            metadata: None,
            filtered: None,
        })
    }
}

/// Failure surfaced to API clients: a message and nothing else.
#[derive(Debug)]
pub struct ApiError(String);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);

        let body = Json(json!({
            "success": false,
            "error": self.0,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// GET /api/metas
///
/// All normalized metas plus snapshot metadata. Optional query
/// parameters `programa`, `evaluacion`, `estado`, `responsable`, `q`
/// narrow the list.
pub async fn get_metas(
    State(state): State<AppState>,
    Query(filter): Query<MetaFilter>,
) -> Result<Response, ApiError> {
    let snapshot = state.gateway.metas().await?;
    let metadata = Some(snapshot.metadata().clone());

    let response = if filter.is_empty() {
        Json(ApiResponse {
            success: true,
            data: snapshot.metas().iter().collect::<Vec<&Meta>>(),
            metadata,
            filtered: None,
        })
    } else {
        let data = filter.apply(snapshot.metas());
        Json(ApiResponse {
            success: true,
            filtered: Some(data.len()),
            data,
            metadata,
        })
    };

    Ok(response.into_response())
}

/// Distinct values for the dashboard's list selectors.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub programas: Vec<String>,
    pub responsables: Vec<String>,
    pub estados: Vec<String>,
    pub evaluaciones: Vec<&'static str>,
}

/// GET /api/metas/filters
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FilterOptions>>, ApiError> {
    let dataset = state.gateway.dataset().await?;
    let metas = &dataset.metas;

    Ok(ApiResponse::ok(FilterOptions {
        programas: distinct_values(metas, |m| m.programa.as_str()),
        responsables: distinct_values(metas, |m| m.dependencia_responsable.as_str()),
        estados: distinct_values(metas, |m| m.estado_proyecto.as_str()),
        evaluaciones: crate::models::Evaluacion::ALL
            .iter()
            .map(|tier| tier.label())
            .collect(),
    }))
}

/// GET /api/metrics/global
pub async fn get_global_metrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GlobalMetrics>>, ApiError> {
    Ok(ApiResponse::ok(state.gateway.global_metrics().await?))
}

/// GET /api/metrics/programs
pub async fn get_program_performance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProgramPerformance>>, ApiError> {
    Ok(ApiResponse::ok(state.gateway.program_performance().await?))
}

/// GET /api/metrics/evaluations
pub async fn get_evaluation_distribution(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EvaluationDistribution>>, ApiError> {
    let dataset = state.gateway.dataset().await?;
    Ok(ApiResponse::ok(evaluation_distribution(&dataset.metas)))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Whether the dataset has been loaded yet.
    pub cached: bool,
    /// Load attempts so far, failed ones included.
    pub load_attempts: usize,
    pub source: String,
}

/// GET /health
///
/// Never triggers a data load.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached: state.gateway.is_populated(),
        load_attempts: state.gateway.population_count(),
        source: state.gateway.source_name().to_string(),
    })
}
