//! tally-cli: replay UTXO settlement epochs from a ledger file.
//!
//! `sample` writes a signed demonstration ledger; `replay` runs every epoch
//! of a ledger through one transaction handler and prints what was admitted.

mod config;
mod ledger_file;
mod replay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{CliConfig, LogFormat};
use crate::ledger_file::LedgerFile;

/// Tally settlement tool.
#[derive(Parser, Debug)]
#[command(name = "tally-cli", version, about = "Replay UTXO settlement epochs")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a signed demonstration ledger file.
    Sample {
        /// Output path (defaults to ./ledger.json)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Seed for the demonstration keys
        #[arg(long, default_value_t = 1)]
        seed: u8,
    },
    /// Process every epoch in a ledger file and report the outcome.
    Replay {
        /// Ledger file (defaults to ./ledger.json)
        path: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Split CLI args into shared config and the subcommand to run.
    fn into_config(self) -> (CliConfig, Commands) {
        let config = CliConfig {
            log_level: self.log_level,
            log_format: self.log_format,
            ..CliConfig::default()
        };
        (config, self.command)
    }
}

fn main() -> Result<()> {
    let (config, command) = Cli::parse().into_config();
    init_logging(&config.log_level, config.log_format);

    match command {
        Commands::Sample { out, seed } => {
            let path = config.ledger_path_or_default(out);
            let file = LedgerFile::sample(seed).context("building sample ledger")?;
            file.save(&path)?;
            info!(path = %path.display(), epochs = file.epochs.len(), "wrote sample ledger");
            println!("wrote {}", path.display());
        }
        Commands::Replay { path, json } => {
            let path = config.ledger_path_or_default(path);
            let file = LedgerFile::load(&path)?;
            let report = replay::replay(&file).context("replaying ledger")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn print_report(report: &replay::ReplayReport) {
    for epoch in &report.epochs {
        println!(
            "epoch {}: {} accepted, {} rejected ({} spent, {} created)",
            epoch.epoch,
            epoch.accepted.len(),
            epoch.rejected.len(),
            epoch.utxos_spent,
            epoch.utxos_created,
        );
        for txid in &epoch.accepted {
            println!("  + {txid}");
        }
        for rejection in &epoch.rejected {
            println!("  - #{}: {}", rejection.position, rejection.reason);
        }
    }
    for line in &report.final_utxos {
        println!("  {} {} -> {}", line.outpoint, line.value, line.owner);
    }
    match report.final_value {
        Some(value) => println!("final pool: {} utxos, value {value}", report.final_utxo_count),
        None => println!("final pool: {} utxos, value overflows", report.final_utxo_count),
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` overrides `level_str` when set. Logs go to stderr so stdout
/// stays clean for reports.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init(),
    }
}
