//! # notify-conditional CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Config loading and validation
//! - One-shot conditional fan-out of a message

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_info, run_send, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        "notify-conditional starting"
    );

    let result = match &cli.command {
        Commands::Send(args) => run_send(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Map CLI options onto the observability setup
fn observability_config(cli: &Cli) -> observability::ObservabilityConfig {
    let (default_log_level, force_level) = if cli.quiet {
        ("warn", true)
    } else {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        (level, false)
    };

    let metrics_port = match &cli.command {
        Commands::Send(args) => args.metrics_port,
        _ => None,
    };

    observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        default_log_level: default_log_level.to_string(),
        force_level,
    }
}
