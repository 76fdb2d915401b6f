//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::check_config::CheckConfigArgs;
use super::commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "snow-bridge")]
#[command(about = "Snow Bridge - GitHub Issues to ServiceNow incident sync", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bridge HTTP server
    Serve(ServeArgs),

    /// Load and validate configuration, then print a redacted summary
    CheckConfig(CheckConfigArgs),
}
