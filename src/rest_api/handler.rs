//! # Read Operations
//!
//! Orchestrates the three read operations. Each request walks
//!
//! `RECEIVED -> VALIDATING -> QUERYING -> [RESOLVING_HEADER] -> SHAPING -> RESPONDING`
//!
//! and any step may end it in `FAILED`. A request holds exactly one pooled
//! connection from the start of QUERYING until it returns; the connection is
//! an owned box, so it goes back to the pool on every exit path.

use std::sync::Arc;

use tracing::debug;

use crate::store::ConnectionProvider;

use super::errors::{RestError, RestResult};
use super::header::{resolve_header, HeaderFailurePolicy};
use super::parser::{parse_id, SincePolicy, SinceDate, SyncParams};
use super::query::{headers_query, index_query, shabad_query};
use super::response::{HeadersResponse, IndexResponse, ShabadResponse};
use super::shaper::{shape_headers, shape_rows, JoinedRow, RowShape};

/// Behavior switches for the read operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub header_failure: HeaderFailurePolicy,
    pub since_policy: SincePolicy,
}

/// Runs the read operations against an injected connection provider
#[derive(Clone)]
pub struct KeertanHandler {
    provider: Arc<dyn ConnectionProvider>,
    options: QueryOptions,
}

impl KeertanHandler {
    pub fn new(provider: Arc<dyn ConnectionProvider>, options: QueryOptions) -> Self {
        Self { provider, options }
    }

    /// Parameters for a query string that could not be read at all
    /// (repeated keys, bad percent-encoding). Treated like an unparseable
    /// `updatedsince`: no filter under `Ignore`, 400 under `Reject`.
    pub fn unreadable_params(&self, reason: &str) -> RestResult<SyncParams> {
        match self.options.since_policy {
            SincePolicy::Ignore => {
                debug!(stage = "validating", reason, "ignoring unreadable query string");
                Ok(SyncParams::default())
            }
            SincePolicy::Reject => Err(RestError::InvalidQueryParam(format!(
                "unreadable query string: {}",
                reason
            ))),
        }
    }

    /// List every header
    pub async fn headers(&self) -> RestResult<HeadersResponse> {
        let mut conn = self.provider.acquire().await?;

        debug!(stage = "querying", "listing headers");
        let rows = conn.query(&headers_query()).await?;

        debug!(stage = "shaping", rows = rows.len());
        let headers = shape_headers(&rows)?;
        Ok(HeadersResponse { headers })
    }

    /// List index entries, optionally for one header (`raw_header` from the path)
    pub async fn index(
        &self,
        raw_header: Option<&str>,
        params: &SyncParams,
    ) -> RestResult<IndexResponse> {
        debug!(stage = "validating", header = ?raw_header);
        let header_id = raw_header.map(|raw| parse_id(raw, "HeaderID")).transpose()?;
        let since = params.since(self.options.since_policy)?;

        self.run_index(header_id, since).await
    }

    /// List the verses of one shabad (`raw_shabad` from the path)
    pub async fn shabad(&self, raw_shabad: &str, params: &SyncParams) -> RestResult<ShabadResponse> {
        debug!(stage = "validating", shabad = raw_shabad);
        let shabad_id = parse_id(raw_shabad, "ShabadID")?;
        let since = params.since(self.options.since_policy)?;

        self.run_shabad(shabad_id, since).await
    }

    async fn run_index(
        &self,
        header_id: Option<i64>,
        since: Option<SinceDate>,
    ) -> RestResult<IndexResponse> {
        let mut conn = self.provider.acquire().await?;

        debug!(stage = "querying", ?header_id, since = ?since.map(|s| s.to_sql_text()));
        let rows = conn.query(&index_query(header_id, since.as_ref())).await?;

        let header = match header_id {
            Some(id) => {
                debug!(stage = "resolving_header", header_id = id);
                let lookup = resolve_header(conn.as_mut(), id).await;
                Some(lookup.into_envelope(id, self.options.header_failure)?)
            }
            None => None,
        };

        debug!(stage = "shaping", rows = rows.len());
        let index = shape_rows(&rows, RowShape::IndexEntry)?;
        Ok(IndexResponse { header, index })
    }

    async fn run_shabad(
        &self,
        shabad_id: i64,
        since: Option<SinceDate>,
    ) -> RestResult<ShabadResponse> {
        let mut conn = self.provider.acquire().await?;

        debug!(stage = "querying", shabad_id, since = ?since.map(|s| s.to_sql_text()));
        let rows = conn.query(&shabad_query(shabad_id, since.as_ref())).await?;
        if rows.is_empty() {
            return Err(RestError::shabad_not_found());
        }

        let joined = rows
            .iter()
            .map(JoinedRow::decode)
            .collect::<Result<Vec<_>, _>>()?;

        let header = match joined.first().and_then(|row| row.header_id) {
            Some(id) => {
                debug!(stage = "resolving_header", header_id = id);
                resolve_header(conn.as_mut(), id)
                    .await
                    .into_envelope(id, self.options.header_failure)?
            }
            None => Vec::new(),
        };

        debug!(stage = "shaping", rows = joined.len());
        let verses = joined.iter().map(|row| row.shape(RowShape::Verse)).collect();
        Ok(ShabadResponse { header, verses })
    }
}
