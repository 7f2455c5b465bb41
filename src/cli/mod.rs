//! CLI module
//!
//! - serve: load configuration, open the datastore, run the HTTP API
//! - check: validate configuration and datastore access, print a summary

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use config::{Config, DatabaseConfig, QueryConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
