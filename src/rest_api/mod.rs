//! # Amrit Keertan REST API Module
//!
//! Query composition, header resolution and row shaping for the read-only
//! endpoints, plus their Axum routes.

pub mod errors;
pub mod filter;
pub mod handler;
pub mod header;
pub mod parser;
pub mod query;
pub mod response;
pub mod server;
pub mod shaper;

pub use errors::{RestError, RestResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use handler::{KeertanHandler, QueryOptions};
pub use header::{HeaderFailurePolicy, HeaderLookup};
pub use parser::{SincePolicy, SinceDate, SyncParams};
pub use response::{HeadersResponse, IndexResponse, ShabadResponse};
pub use server::RestServer;
pub use shaper::{HeaderView, IndexEntryView, JoinedRow, RowShape, ShapedRow, VerseView};
