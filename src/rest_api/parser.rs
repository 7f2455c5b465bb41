//! # Request Parameter Parsing
//!
//! Path ids and the `updatedsince` query parameter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use super::errors::{RestError, RestResult};

/// Format `Updated` values are stored and compared in
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// What to do with an `updatedsince` value that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SincePolicy {
    /// Drop the filter and answer as if the parameter were absent
    #[default]
    Ignore,

    /// Fail the request with 400
    Reject,
}

/// A validated incremental-sync cutoff, normalized to UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SinceDate(NaiveDateTime);

impl SinceDate {
    /// Parse a client-supplied date-time.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (with
    /// optional fractional seconds) and a bare `YYYY-MM-DD` meaning midnight.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc).naive_utc()));
        }

        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Self(dt));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
    }

    /// Text bound to `v.Updated > ?`
    pub fn to_sql_text(&self) -> String {
        self.0.format(SQL_DATETIME_FORMAT).to_string()
    }
}

/// Query string accepted by the index and shabad endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncParams {
    #[serde(default)]
    pub updatedsince: Option<String>,
}

impl SyncParams {
    pub fn with_since(raw: impl Into<String>) -> Self {
        Self {
            updatedsince: Some(raw.into()),
        }
    }

    /// Resolve the since-filter. Absent or empty means no filter.
    pub fn since(&self, policy: SincePolicy) -> RestResult<Option<SinceDate>> {
        let raw = match self.updatedsince.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        match (SinceDate::parse(raw), policy) {
            (Some(date), _) => Ok(Some(date)),
            (None, SincePolicy::Ignore) => Ok(None),
            (None, SincePolicy::Reject) => Err(RestError::InvalidQueryParam(format!(
                "updatedsince is not a valid date-time: {}",
                raw
            ))),
        }
    }
}

/// Parse a positive integer path id
pub fn parse_id(raw: &str, name: &str) -> RestResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RestError::InvalidPathParam(format!(
            "{} must be a positive integer, got {:?}",
            name, raw
        ))),
    }
}
