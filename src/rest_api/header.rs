//! # Header Resolution
//!
//! Secondary lookup attaching a header record to index and shabad responses.
//! The lookup reports what happened; the caller's [`HeaderFailurePolicy`]
//! decides whether a failure degrades to an empty `header` array or fails the
//! request.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{Connection, StoreError};

use super::errors::RestResult;
use super::query::header_query;
use super::shaper::{shape_headers, HeaderView};

/// Outcome of a header lookup
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLookup {
    Found(HeaderView),
    Missing,
    Failed(StoreError),
}

/// How a failed header lookup affects the parent request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFailurePolicy {
    /// Log and answer with `header: []`
    #[default]
    Degrade,

    /// Fail the request with the datastore error
    Propagate,
}

/// Look up one header on an already checked-out connection
pub async fn resolve_header(conn: &mut dyn Connection, header_id: i64) -> HeaderLookup {
    let query = header_query(header_id);
    let result = conn
        .query(&query)
        .await
        .and_then(|rows| shape_headers(&rows));

    match result {
        Ok(headers) => match headers.into_iter().next() {
            Some(header) => HeaderLookup::Found(header),
            None => HeaderLookup::Missing,
        },
        Err(err) => HeaderLookup::Failed(err),
    }
}

impl HeaderLookup {
    /// Convert to the `header` array of a response envelope
    pub fn into_envelope(
        self,
        header_id: i64,
        policy: HeaderFailurePolicy,
    ) -> RestResult<Vec<HeaderView>> {
        match self {
            HeaderLookup::Found(header) => Ok(vec![header]),
            HeaderLookup::Missing => Ok(Vec::new()),
            HeaderLookup::Failed(err) => match policy {
                HeaderFailurePolicy::Degrade => {
                    warn!(header_id, error = %err, "header lookup failed; responding without header");
                    Ok(Vec::new())
                }
                HeaderFailurePolicy::Propagate => Err(err.into()),
            },
        }
    }
}
