//! # Connection Capability
//!
//! Operations acquire one connection per unit of work and hold it as an owned
//! value. Dropping the box returns it to its pool, so release happens on every
//! exit path, including `?` propagation and panics.

use std::future::Future;
use std::pin::Pin;

use super::errors::StoreResult;
use super::value::{BoundQuery, Row};

/// Boxed future returned by datastore calls
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// A checked-out connection
pub trait Connection: Send {
    /// Execute a read-only statement and return every row in result order
    fn query<'a>(&'a mut self, query: &'a BoundQuery) -> StoreFuture<'a, Vec<Row>>;
}

/// Source of pooled connections
pub trait ConnectionProvider: Send + Sync {
    /// Check out a connection, waiting if the pool is exhausted
    fn acquire(&self) -> StoreFuture<'_, Box<dyn Connection>>;
}
