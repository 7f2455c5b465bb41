//! Configuration file
//!
//! A single JSON document. Only `database.path` is required.
//!
//! ```json
//! {
//!   "environment": "production",
//!   "database": { "path": "/srv/banidb/keertan.sqlite", "pool_size": 8 },
//!   "server": { "base_path": "/v2", "cache_max_age_secs": 21600 },
//!   "logging": { "level": "info", "format": "json" },
//!   "query": { "header_failure": "degrade", "reject_invalid_since": false }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::{Environment, HttpServerConfig};
use crate::observability::{filter_from_level, LoggingConfig};
use crate::rest_api::{HeaderFailurePolicy, QueryOptions, SincePolicy};
use crate::store::sqlite::DEFAULT_POOL_SIZE;
use crate::store::SqlitePoolConfig;

use super::errors::{CliError, CliResult};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

/// Datastore settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file (required)
    pub path: PathBuf,

    /// Maximum pooled connections (default: 8)
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

/// Read-operation behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// What a failed header lookup does to its request (default: degrade)
    #[serde(default)]
    pub header_failure: HeaderFailurePolicy,

    /// Answer 400 to a malformed `updatedsince` instead of ignoring it
    #[serde(default)]
    pub reject_invalid_since: bool,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(CliError::config_error("database.path must not be empty"));
        }

        if self.database.pool_size == 0 {
            return Err(CliError::config_error("database.pool_size must be > 0"));
        }

        self.server
            .validate()
            .map_err(|e| CliError::config_error(format!("server: {}", e)))?;

        filter_from_level(&self.logging.level)
            .map_err(|e| CliError::config_error(format!("logging: {}", e)))?;

        Ok(())
    }

    pub fn pool_config(&self) -> SqlitePoolConfig {
        SqlitePoolConfig::new(self.database.path.clone()).with_pool_size(self.database.pool_size)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            header_failure: self.query.header_failure,
            since_policy: if self.query.reject_invalid_since {
                SincePolicy::Reject
            } else {
                SincePolicy::Ignore
            },
        }
    }
}
