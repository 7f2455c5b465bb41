//! Observability for the scripture API
//!
//! Structured logging through `tracing`. Each HTTP request runs inside a
//! `request` span carrying the operation name and a request id; the read
//! operations emit one debug event per stage.

mod logging;

pub use logging::{filter_from_level, init_logging, LogFormat, LoggingConfig};

use thiserror::Error;

/// Observability error
///
/// Observability failure must never take the API down; callers report these
/// and continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    /// Level or directive string did not parse
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
