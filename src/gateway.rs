//! Memoized access to the ingested dataset.
//!
//! The gateway owns the source and a write-once cell. The first query
//! runs load → normalize → aggregate; every later query is served from
//! the cell. A failed run leaves the cell empty so the next query retries.

use crate::analysis::{global_metrics, program_performance};
use crate::ingest::{normalize_rows, IngestError, MetasSource};
use crate::models::{Dataset, GlobalMetrics, Meta, Metadata, ProgramPerformance};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

/// Errors surfaced by gateway queries.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to parse Excel file: {0}")]
    Load(#[from] IngestError),

    #[error("Data loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run the full pipeline once over `source`.
pub fn build_dataset(source: &dyn MetasSource) -> Result<Dataset, IngestError> {
    let rows = source.load()?;

    let metas = normalize_rows(&rows);
    info!("Metas normalized: {}", metas.len());
    if let Some(first) = metas.first() {
        debug!(
            "First meta: id={} programa={} t1_plan={} t1_ejec={} avance={}",
            first.id, first.programa, first.t1_plan, first.t1_ejec, first.avance
        );
    }

    debug!("Computing global metrics...");
    let global_metrics = global_metrics(&metas);
    debug!("Computing program performance...");
    let program_performance = program_performance(&metas);

    let metadata = Metadata {
        total_metas: metas.len(),
        last_updated: Utc::now(),
        source: source.name().to_string(),
    };

    Ok(Dataset {
        metas,
        global_metrics,
        program_performance,
        metadata,
    })
}

/// Cached metas and their snapshot metadata. Cloning shares the snapshot.
#[derive(Debug, Clone)]
pub struct MetasSnapshot(Arc<Dataset>);

impl MetasSnapshot {
    pub fn metas(&self) -> &[Meta] {
        &self.0.metas
    }

    pub fn metadata(&self) -> &Metadata {
        &self.0.metadata
    }
}

/// Single-flight, memoized access to the dataset.
pub struct DataGateway {
    source: Arc<dyn MetasSource>,
    cell: OnceCell<Arc<Dataset>>,
    populations: AtomicUsize,
}

impl DataGateway {
    /// Create a gateway over a source. Nothing is read until the first query.
    pub fn new(source: Arc<dyn MetasSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
            populations: AtomicUsize::new(0),
        }
    }

    /// Name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Whether a snapshot has been cached.
    pub fn is_populated(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of pipeline runs started so far, successful or not.
    pub fn population_count(&self) -> usize {
        self.populations.load(Ordering::SeqCst)
    }

    /// The cached dataset, building it on first use.
    ///
    /// Concurrent first callers wait for a single in-flight build.
    pub async fn dataset(&self) -> Result<Arc<Dataset>, GatewayError> {
        if let Some(dataset) = self.cell.get() {
            debug!("Using cached data");
            return Ok(Arc::clone(dataset));
        }

        let dataset = self.cell.get_or_try_init(|| self.populate()).await?;
        Ok(Arc::clone(dataset))
    }

    /// All normalized metas with snapshot metadata, borrowed from the cache.
    pub async fn metas(&self) -> Result<MetasSnapshot, GatewayError> {
        Ok(MetasSnapshot(self.dataset().await?))
    }

    /// Global completion metrics.
    pub async fn global_metrics(&self) -> Result<GlobalMetrics, GatewayError> {
        Ok(self.dataset().await?.global_metrics.clone())
    }

    /// Per-program completion metrics.
    pub async fn program_performance(&self) -> Result<ProgramPerformance, GatewayError> {
        Ok(self.dataset().await?.program_performance.clone())
    }

    async fn populate(&self) -> Result<Arc<Dataset>, GatewayError> {
        let attempt = self.populations.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Loading data from {} (attempt {})...",
            self.source.name(),
            attempt
        );

        let source = Arc::clone(&self.source);
        let result = tokio::task::spawn_blocking(move || build_dataset(source.as_ref())).await?;

        match result {
            Ok(dataset) => {
                info!(
                    "Data cached: {} metas, global completion {}%",
                    dataset.metadata.total_metas, dataset.global_metrics.cumplimiento_global
                );
                Ok(Arc::new(dataset))
            }
            Err(e) => {
                error!("Error loading {}: {}", self.source.name(), e);
                Err(e.into())
            }
        }
    }
}
