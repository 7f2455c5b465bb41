//! # Datastore Access
//!
//! The read-only capability the API core runs against: acquire a pooled
//! connection, run a parameterized query, get back ordered rows.
//!
//! The core never names a concrete driver. Operations receive an
//! `Arc<dyn ConnectionProvider>`; the bundled [`SqlitePool`] is the production
//! provider and tests substitute their own.

pub mod errors;
pub mod provider;
pub mod sqlite;
pub mod value;

pub use errors::{StoreError, StoreResult};
pub use provider::{Connection, ConnectionProvider, StoreFuture};
pub use sqlite::{SqlitePool, SqlitePoolConfig};
pub use value::{BoundQuery, Row, SqlValue};
