//! HTTP Server Configuration
//!
//! Host, port, base path, CORS and cache settings for the HTTP server.

use serde::{Deserialize, Serialize};

/// Deployment environment; selects the default port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn default_port(&self) -> u16 {
        match self {
            Environment::Production => 3000,
            Environment::Development => 3001,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: chosen by environment)
    #[serde(default)]
    pub port: Option<u16>,

    /// Prefix every API route is nested under (default: "/v2")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// `Cache-Control: max-age` for API responses (default: 6 hours)
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_base_path() -> String {
    "/v2".to_string()
}

fn default_cache_max_age() -> u64 {
    21600
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            base_path: default_base_path(),
            cors_origins: Vec::new(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port: Some(port),
            ..Default::default()
        }
    }

    /// Port to listen on
    pub fn resolved_port(&self, environment: Environment) -> u16 {
        self.port.unwrap_or_else(|| environment.default_port())
    }

    /// Get the socket address string
    pub fn socket_addr(&self, environment: Environment) -> String {
        format!("{}:{}", self.host, self.resolved_port(environment))
    }

    /// Check the base path is `/` or `/segment[/segment...]` without a trailing slash
    pub fn validate(&self) -> Result<(), String> {
        let path = self.base_path.as_str();
        if !path.starts_with('/') {
            return Err(format!("base_path must start with '/': {:?}", path));
        }
        if path.len() > 1 && path.ends_with('/') {
            return Err(format!("base_path must not end with '/': {:?}", path));
        }
        if path.contains(['{', '}', '*']) {
            return Err(format!("base_path must be a literal path: {:?}", path));
        }
        Ok(())
    }
}
