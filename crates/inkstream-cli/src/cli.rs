//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inkstream CLI - Watch structured articles emerge from streamed model output.
#[derive(Debug, Parser)]
#[command(name = "inkstream")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "INKSTREAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (title only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a document from complete model output
    Extract(ExtractArgs),

    /// Replay model output as a stream, showing each partial document
    Stream(StreamArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// File containing model output (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Parse as mid-stream text instead of a finished response
    #[arg(long)]
    pub partial: bool,

    /// Also report which grammar matched
    #[arg(long)]
    pub show_grammar: bool,
}

/// Arguments for the stream command.
#[derive(Debug, Parser)]
pub struct StreamArgs {
    /// File containing model output (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Bytes per chunk fed to the session
    #[arg(long, default_value = "16")]
    pub chunk_size: usize,

    /// Delay between chunks in milliseconds
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,

    /// Print every Nth partial update
    #[arg(long, default_value = "1")]
    pub every: usize,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
