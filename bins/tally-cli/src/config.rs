//! Runtime configuration for the tally CLI.

use std::path::PathBuf;

use clap::ValueEnum;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log aggregation pipelines.
    Json,
}

/// Configuration shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log level filter string (e.g. "info", "debug", "tally_core=trace").
    /// `RUST_LOG` takes precedence when set.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Ledger file read by `replay` and written by `sample` when no path is given.
    pub ledger_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            ledger_path: PathBuf::from("ledger.json"),
        }
    }
}

impl CliConfig {
    /// Resolve the ledger path for a subcommand, falling back to the default.
    pub fn ledger_path_or_default(&self, path: Option<PathBuf>) -> PathBuf {
        path.unwrap_or_else(|| self.ledger_path.clone())
    }
}
