//! # SQLite Connection Pool
//!
//! Bounded pool of read-only SQLite connections.
//!
//! - A semaphore caps concurrent checkouts at `pool_size`
//! - Idle connections are reused LIFO; new ones are opened lazily
//! - Statements run on the blocking thread pool
//! - A connection lost to a worker panic is replaced on the next checkout

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::OpenFlags;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, trace};

use super::errors::{StoreError, StoreResult};
use super::provider::{Connection, ConnectionProvider, StoreFuture};
use super::value::{BoundQuery, Row, SqlValue};

/// Default number of pooled connections
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Default time a statement waits on a locked database file
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool settings
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Database file
    pub path: PathBuf,

    /// Maximum concurrent checkouts
    pub pool_size: usize,

    /// Busy timeout applied to each connection
    pub busy_timeout: Duration,
}

impl SqlitePoolConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

struct PoolInner {
    config: SqlitePoolConfig,
    idle: Mutex<Vec<rusqlite::Connection>>,
    permits: Arc<Semaphore>,
}

/// Read-only SQLite pool implementing [`ConnectionProvider`]
#[derive(Clone)]
pub struct SqlitePool {
    inner: Arc<PoolInner>,
}

impl SqlitePool {
    /// Open the pool.
    ///
    /// One connection is opened eagerly so a missing or unreadable database
    /// file fails here rather than on the first request.
    pub fn open(config: SqlitePoolConfig) -> StoreResult<Self> {
        if config.pool_size == 0 {
            return Err(StoreError::connection("pool_size must be > 0"));
        }

        let first = open_connection(&config)?;
        debug!(
            path = %config.path.display(),
            pool_size = config.pool_size,
            "sqlite pool opened"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                permits: Arc::new(Semaphore::new(config.pool_size)),
                idle: Mutex::new(vec![first]),
                config,
            }),
        })
    }

    /// Checkouts that can be granted without waiting
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Open connections currently parked in the pool
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().len()
    }
}

impl ConnectionProvider for SqlitePool {
    fn acquire(&self) -> StoreFuture<'_, Box<dyn Connection>> {
        Box::pin(async move {
            let permit = Arc::clone(&self.inner.permits)
                .acquire_owned()
                .await
                .map_err(|_| StoreError::connection("pool is closed"))?;

            let parked = self.inner.idle.lock().pop();
            let conn = match parked {
                Some(conn) => conn,
                None => {
                    let config = self.inner.config.clone();
                    tokio::task::spawn_blocking(move || open_connection(&config))
                        .await
                        .map_err(|e| StoreError::internal(format!("open worker failed: {}", e)))??
                }
            };

            trace!(available = self.available(), "connection checked out");

            Ok(Box::new(PooledConnection {
                conn: Some(conn),
                pool: Arc::clone(&self.inner),
                _permit: permit,
            }) as Box<dyn Connection>)
        })
    }
}

/// A checked-out connection. Returns itself to the pool on drop.
struct PooledConnection {
    conn: Option<rusqlite::Connection>,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl Connection for PooledConnection {
    fn query<'a>(&'a mut self, query: &'a BoundQuery) -> StoreFuture<'a, Vec<Row>> {
        Box::pin(async move {
            let conn = self
                .conn
                .take()
                .ok_or_else(|| StoreError::connection("connection was lost by an earlier failure"))?;
            let owned = query.clone();

            let (conn, result) = tokio::task::spawn_blocking(move || {
                let result = run_query(&conn, &owned);
                (conn, result)
            })
            .await
            .map_err(|e| StoreError::internal(format!("query worker failed: {}", e)))?;

            self.conn = Some(conn);
            result
        })
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.idle.lock().push(conn);
        }
        // Permit is released after the connection is parked.
    }
}

fn open_connection(config: &SqlitePoolConfig) -> StoreResult<rusqlite::Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;

    let conn = rusqlite::Connection::open_with_flags(&config.path, flags).map_err(|e| {
        StoreError::connection(format!("failed to open {}: {}", config.path.display(), e))
    })?;
    conn.busy_timeout(config.busy_timeout)?;
    Ok(conn)
}

fn run_query(conn: &rusqlite::Connection, query: &BoundQuery) -> StoreResult<Vec<Row>> {
    let mut stmt = conn.prepare_cached(query.sql())?;
    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let width = columns.len();

    let mut rows = stmt.query(rusqlite::params_from_iter(query.params().iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(SqlValue::from(row.get_ref(i)?));
        }
        out.push(Row::new(Arc::clone(&columns), values));
    }

    trace!(rows = out.len(), params = query.params().len(), "query complete");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_db() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.sqlite");
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE Item (ID INTEGER PRIMARY KEY, Name TEXT);
             INSERT INTO Item VALUES (1, 'one'), (2, 'two'), (3, NULL);",
        )
        .unwrap();
        (dir, path)
    }

    fn open_pool(path: &PathBuf, size: usize) -> SqlitePool {
        SqlitePool::open(SqlitePoolConfig::new(path.clone()).with_pool_size(size)).unwrap()
    }

    #[tokio::test]
    async fn test_query_with_params() {
        let (_dir, path) = create_db();
        let pool = open_pool(&path, 2);

        let mut conn = pool.acquire().await.unwrap();
        let query = BoundQuery::new(
            "SELECT ID, Name FROM Item WHERE ID > ? ORDER BY ID ASC",
            vec![SqlValue::Integer(1)],
        );
        let rows = conn.query(&query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns(), &["ID".to_string(), "Name".to_string()]);
        assert_eq!(rows[0].int("ID").unwrap(), 2);
        assert_eq!(rows[0].opt_text("Name").unwrap().as_deref(), Some("two"));
        assert_eq!(rows[1].opt_text("Name").unwrap(), None);
    }

    #[tokio::test]
    async fn test_connection_released_on_drop() {
        let (_dir, path) = create_db();
        let pool = open_pool(&path, 2);
        assert_eq!(pool.available(), 2);

        {
            let _a = pool.acquire().await.unwrap();
            let _b = pool.acquire().await.unwrap();
            assert_eq!(pool.available(), 0);
        }

        assert_eq!(pool.available(), 2);
        assert_eq!(pool.idle_count(), 2);
    }

    #[tokio::test]
    async fn test_connection_released_after_query_error() {
        let (_dir, path) = create_db();
        let pool = open_pool(&path, 1);

        {
            let mut conn = pool.acquire().await.unwrap();
            let err = conn
                .query(&BoundQuery::new("SELECT * FROM Missing", vec![]))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Query(_)));
        }

        assert_eq!(pool.available(), 1);
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn test_acquire_waits_when_exhausted() {
        let (_dir, path) = create_db();
        let pool = open_pool(&path, 1);

        let held = pool.acquire().await.unwrap();
        let waiting = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(waiting.is_err());

        drop(held);
        let again = tokio::time::timeout(Duration::from_secs(5), pool.acquire()).await;
        assert!(matches!(again, Ok(Ok(_))));
    }

    #[tokio::test]
    async fn test_pool_is_read_only() {
        let (_dir, path) = create_db();
        let pool = open_pool(&path, 1);

        let mut conn = pool.acquire().await.unwrap();
        let err = conn
            .query(&BoundQuery::new("DELETE FROM Item", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = SqlitePool::open(SqlitePoolConfig::new(dir.path().join("absent.sqlite")));
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let (_dir, path) = create_db();
        let result = SqlitePool::open(SqlitePoolConfig::new(path).with_pool_size(0));
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
}
