//! Log subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Noisy dependencies held at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: [&str; 3] = ["hyper", "h2", "tower"];

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact text: timestamp LEVEL target fields
    #[default]
    Compact,
    /// JSON Lines, one event per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level or directive list (default: "info")
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Build a filter from a base level plus the quiet-target overrides
pub fn filter_from_level(level: &str) -> ObservabilityResult<EnvFilter> {
    let mut directives = vec![level.to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|t| format!("{}=warn", t)));

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| ObservabilityError::InvalidFilter(format!("'{}': {}", filter_str, e)))
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> ObservabilityResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_from_level(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };

    result.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_format_deserialize() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_filter_from_level() {
        assert!(filter_from_level("info").is_ok());
        assert!(filter_from_level("amritkeertan_api=trace").is_ok());
        assert!(matches!(
            filter_from_level("amritkeertan_api=loud"),
            Err(ObservabilityError::InvalidFilter(_))
        ));
    }
}
