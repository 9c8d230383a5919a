//! PlanMetas - development-plan targets dashboard backend
//!
//! Reads the plan's spreadsheet, normalizes each target ("meta"),
//! computes quarterly and per-program completion, and serves the
//! results to the dashboard as JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unreadable spreadsheet, bind failure, etc.)

mod analysis;
mod cli;
mod config;
mod gateway;
mod ingest;
mod models;
mod report;
mod server;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use gateway::DataGateway;
use ingest::{MetasSource, WorkbookSource};
use models::Evaluacion;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the default verbosity, so it is read before logging starts
    let loaded = load_config(&args);
    let verbose = loaded
        .as_ref()
        .map(|(config, _)| config.general.verbose)
        .unwrap_or(false);

    // Initialize logging
    init_logging(args.log_level_with(verbose))?;

    info!("PlanMetas v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = match loaded {
        Ok((config, origin)) => {
            match origin {
                ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
                ConfigOrigin::Default => info!("Loaded default config from {}", CONFIG_FILE),
                ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
                ConfigOrigin::Invalid(e) => warn!("Failed to load config: {}", e),
            }
            run(args, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Fatal: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .planmetas.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to point at your spreadsheet and choose a port.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build the gateway and either write a report or serve the API.
async fn run(args: Args, mut config: Config) -> Result<()> {
    config.merge_with_args(&args);

    let workbook = WorkbookSource::new(&config.source.path);
    info!("Source spreadsheet: {}", workbook.path().display());
    let source: Arc<dyn MetasSource> = Arc::new(workbook);
    let gateway = Arc::new(DataGateway::new(source));

    if args.report_requested() {
        return run_report(&args, &config, &gateway).await;
    }

    println!("🚀 Serving metas from {}", config.source.path.display());
    server::serve(&config.server, gateway).await
}

/// Handle --report: load the spreadsheet once, write the report, print a summary.
async fn run_report(args: &Args, config: &Config, gateway: &DataGateway) -> Result<()> {
    let start_time = Instant::now();

    println!("📥 Reading {}", config.source.path.display());
    let dataset = gateway
        .dataset()
        .await
        .context("Could not load the spreadsheet")?;

    let output = Path::new(&config.report.output);
    println!("📝 Generating report...");
    report::write_report(&dataset, output, args.format, config.report.top_programs)?;

    let metrics = &dataset.global_metrics;
    let dist = analysis::evaluation_distribution(&dataset.metas);

    println!("\n📊 Summary:");
    println!("   Metas: {}", metrics.total_metas);
    println!("   Programs: {}", dataset.program_performance.len());
    println!("   Global completion: {}%", metrics.cumplimiento_global);
    let tiers: Vec<String> = Evaluacion::ALL
        .iter()
        .map(|tier| format!("{} {}: {}", tier.emoji(), tier.label(), dist.count(*tier)))
        .collect();
    println!("   {}", tiers.join(" | "));
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Report saved to: {}", output.display());

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    Default,
    Builtin,
    Invalid(anyhow::Error),
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` that cannot be read is fatal; a broken default
/// file falls back to the built-in defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::Default)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Invalid(e))),
    }
}
