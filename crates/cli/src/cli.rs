//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// notify-conditional - send one message to every notify service whose conditions hold
#[derive(Parser, Debug)]
#[command(
    name = "notify-conditional",
    author,
    version,
    about = "Conditional notification fan-out",
    long_about = "Loads a list of notify targets, evaluates each target's conditions and \n\
                  sends the message to every qualifying target concurrently, merging the \n\
                  target's default payload underneath the message."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "NOTIFY_CONDITIONAL_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "NOTIFY_CONDITIONAL_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message to all qualifying targets
    Send(SendArgs),

    /// Validate configuration file without sending
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "notify.toml",
        env = "NOTIFY_CONDITIONAL_CONFIG"
    )]
    pub config: PathBuf,

    /// Message body
    #[arg(default_value = "")]
    pub message: String,

    /// Notification title
    #[arg(long)]
    pub title: Option<String>,

    /// Addressing target (repeatable)
    #[arg(long = "target")]
    pub targets: Vec<String>,

    /// Free-form data as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Extra attribute as KEY=VALUE; VALUE is parsed as JSON when possible (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,

    /// Record calls in memory and print them instead of logging them
    #[arg(long)]
    pub dry_run: bool,

    /// Output the dispatch summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Expose Prometheus metrics on this port
    #[arg(long, env = "NOTIFY_CONDITIONAL_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "notify.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "notify.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
