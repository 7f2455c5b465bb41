//! # Datastore Errors

use serde::Serialize;
use thiserror::Error;

/// Result type for datastore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Datastore errors
///
/// Every variant is terminal for the request that hit it. The REST layer
/// surfaces these to the client as the `data` field of a 400 envelope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Could not open or check out a connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// The driver rejected or failed the statement
    #[error("Query error: {0}")]
    Query(String),

    /// A returned row did not have the expected columns or encodings
    #[error("Decode error: {0}")]
    Decode(String),

    /// Worker task failure or other unexpected condition
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn connection(msg: impl Into<String>) -> Self {
        StoreError::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        StoreError::Query(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        StoreError::Decode(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        StoreError::Internal(msg.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Connection(_) => "STORE_CONNECTION",
            StoreError::Query(_) => "STORE_QUERY",
            StoreError::Decode(_) => "STORE_DECODE",
            StoreError::Internal(_) => "STORE_INTERNAL",
        }
    }

    /// Driver message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            StoreError::Connection(m)
            | StoreError::Query(m)
            | StoreError::Decode(m)
            | StoreError::Internal(m) => m,
        }
    }

    /// Wire form used inside error envelopes
    pub fn details(&self) -> StoreErrorDetails {
        StoreErrorDetails {
            code: self.code(),
            message: self.message().to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, _) => StoreError::Query(err.to_string()),
            rusqlite::Error::InvalidColumnIndex(_)
            | rusqlite::Error::InvalidColumnName(_)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..) => StoreError::Decode(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Serialized datastore error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreErrorDetails {
    pub code: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            StoreError::connection("a").code(),
            StoreError::query("a").code(),
            StoreError::decode("a").code(),
            StoreError::internal("a").code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_details_strip_prefix() {
        let err = StoreError::query("no such table: AKIndex");
        assert_eq!(err.to_string(), "Query error: no such table: AKIndex");

        let details = err.details();
        assert_eq!(details.code, "STORE_QUERY");
        assert_eq!(details.message, "no such table: AKIndex");
    }

    #[test]
    fn test_sqlite_failure_maps_to_query() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.prepare("SELECT * FROM missing_table").unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Query(_)));
    }
}
