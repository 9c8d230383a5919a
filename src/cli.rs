//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::{Path, PathBuf};

/// PlanMetas - development-plan targets dashboard backend
///
/// Reads the plan's spreadsheet, normalizes every target ("meta"),
/// computes quarterly and per-program completion, and serves the
/// results as JSON for the dashboard.
///
/// Examples:
///   planmetas
///   planmetas --source data/PlanIndicativo.xlsx --port 8080
///   planmetas --report resumen.md
///   planmetas --report              (writes to [report].output)
///   planmetas --report resumen.json --format json
///   planmetas --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Spreadsheet to read (xlsx, xls, xlsb, ods)
    ///
    /// Only the first sheet is used. Overrides [source].path from the config file.
    #[arg(short, long, value_name = "FILE", env = "PLANMETAS_SOURCE")]
    pub source: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .planmetas.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port for the HTTP server
    #[arg(short, long, value_name = "PORT", env = "PLANMETAS_PORT")]
    pub port: Option<u16>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Write a summary report and exit instead of serving
    ///
    /// Without FILE the report goes to [report].output from the config file.
    #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
    pub report: Option<Option<PathBuf>>,

    /// Report format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .planmetas.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref source) = self.source {
            if source.as_os_str().is_empty() {
                return Err("Source path must not be empty".to_string());
            }
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("Host must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(report) = self.report_file() {
            if report.is_dir() {
                return Err(format!(
                    "Report path is a directory: {}",
                    report.display()
                ));
            }
        }

        Ok(())
    }

    /// Whether `--report` was given, with or without a file.
    pub fn report_requested(&self) -> bool {
        self.report.is_some()
    }

    /// Report file given on the command line, if any.
    pub fn report_file(&self) -> Option<&Path> {
        self.report.as_ref().and_then(|file| file.as_deref())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` comes from `[general] verbose`; `--quiet` still wins.
    pub fn log_level_with(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            source: None,
            config: None,
            host: None,
            port: None,
            no_cors: false,
            report: None,
            format: OutputFormat::Markdown,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "planmetas",
            "--source",
            "plan.xlsx",
            "--port",
            "8080",
            "--report",
            "out.json",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.source, Some(PathBuf::from("plan.xlsx")));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.report_requested());
        assert_eq!(args.report_file(), Some(Path::new("out.json")));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_bare_report_flag() {
        let args = Args::try_parse_from(["planmetas", "--report", "--format", "json"]).unwrap();
        assert!(args.report_requested());
        assert_eq!(args.report_file(), None);
        assert_eq!(args.format, OutputFormat::Json);

        let args = Args::try_parse_from(["planmetas"]).unwrap();
        assert!(!args.report_requested());
    }

    #[test]
    fn test_validation_port_zero() {
        let mut args = make_args();
        args.port = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_source() {
        let mut args = make_args();
        args.source = Some(PathBuf::new());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_report_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = make_args();
        args.report = Some(Some(dir.path().to_path_buf()));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level_with(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level_with(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level_with(false), tracing::Level::ERROR);
        assert_eq!(args.log_level_with(true), tracing::Level::ERROR);

        args.quiet = false;
        assert_eq!(args.log_level_with(true), tracing::Level::DEBUG);
    }
}
