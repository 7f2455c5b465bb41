//! CLI argument definitions using clap
//!
//! Commands:
//! - amritkeertan-api serve --config <path> [--port <port>]
//! - amritkeertan-api check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Read-only JSON API over the Amrit Keertan scripture index
#[derive(Parser, Debug)]
#[command(name = "amritkeertan-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./amritkeertan.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration and datastore access, then exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./amritkeertan.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
