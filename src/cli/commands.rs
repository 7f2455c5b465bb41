//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::rest_api::KeertanHandler;
use crate::store::SqlitePool;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Check { config } => check(&config),
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

fn build_handler(config: &Config) -> CliResult<KeertanHandler> {
    let pool = SqlitePool::open(config.pool_config())?;
    Ok(KeertanHandler::new(Arc::new(pool), config.query_options()))
}

/// Start the HTTP API and serve until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = Some(port);
    }

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
    }

    let handler = build_handler(&config)?;
    let server = HttpServer::new(handler, &config.server, config.environment);

    info!(
        environment = ?config.environment,
        database = %config.database.path.display(),
        pool_size = config.database.pool_size,
        base_path = %config.server.base_path,
        "starting scripture API"
    );
    if config.server.cors_origins.is_empty() {
        warn!("no CORS origins configured; allowing any origin");
    }

    runtime()?.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Load the configuration, open the datastore and list headers once
///
/// Prints one JSON line either way; a failed probe also exits non-zero.
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    let probe = runtime()?.block_on(async {
        let handler = build_handler(&config)?;
        handler
            .headers()
            .await
            .map_err(|e| CliError::boot_failed(format!("Header query failed: {}", e)))
    });
    let summary = match probe {
        Ok(summary) => summary,
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            return Err(e);
        }
    };

    write_response(json!({
        "database": config.database.path.display().to_string(),
        "pool_size": config.database.pool_size,
        "listen": config.server.socket_addr(config.environment),
        "base_path": config.server.base_path,
        "headers": summary.headers.len(),
    }))
}
