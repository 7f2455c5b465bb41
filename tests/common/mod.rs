//! Shared fixture for the integration tests
//!
//! Builds a small Amrit Keertan database in a temp directory:
//!
//! | HeaderID | ShabadID | IndexID   | VerseID      |
//! |----------|----------|-----------|--------------|
//! | 7        | 1        | 1..=5     | 101..=105    |
//! | 8        | 2        | 6         | 201          |
//! | 99 (*)   | 3        | 7         | 301          |
//!
//! (*) no such row in `AKHeaders`.
//!
//! Every verse was updated at [`BASELINE_UPDATE`] except 105, updated at
//! [`LATE_UPDATE`]. `AKIndex` rows are inserted out of order.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use rusqlite::{params, Connection};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use amritkeertan_api::http_server::{Environment, HttpServer, HttpServerConfig};
use amritkeertan_api::rest_api::{KeertanHandler, QueryOptions};
use amritkeertan_api::store::{SqlitePool, SqlitePoolConfig};

pub const BASELINE_UPDATE: &str = "2023-01-01 00:00:00";
pub const LATE_UPDATE: &str = "2024-05-01 00:00:00";

const SCHEMA: &str = "
CREATE TABLE Writer (
    WriterID INTEGER PRIMARY KEY,
    WriterEnglish TEXT, WriterGurmukhi TEXT, WriterUnicode TEXT
);
CREATE TABLE Raag (
    RaagID INTEGER PRIMARY KEY,
    RaagGurmukhi TEXT, RaagUnicode TEXT, RaagEnglish TEXT, RaagWithPage TEXT
);
CREATE TABLE Source (
    SourceID INTEGER PRIMARY KEY,
    SourceGurmukhi TEXT, SourceUnicode TEXT, SourceEnglish TEXT
);
CREATE TABLE Verse (
    ID INTEGER PRIMARY KEY,
    Gurmukhi TEXT, Visraam TEXT, GurmukhiUni TEXT, Translations TEXT,
    PageNo INTEGER, LineNo INTEGER, SourceID INTEGER, Transliterations TEXT,
    WriterID INTEGER, RaagID INTEGER, Updated TEXT
);
CREATE TABLE AKHeaders (
    HeaderID INTEGER PRIMARY KEY,
    Gurmukhi TEXT, GurmukhiUni TEXT, Translations TEXT, Transliterations TEXT, Updated TEXT
);
CREATE TABLE AKIndex (
    IndexID INTEGER PRIMARY KEY,
    HeaderID INTEGER, ShabadID INTEGER, VerseID INTEGER, Page INTEGER
);
CREATE TABLE mv_AK_Shabad (
    VerseID INTEGER, IndexID INTEGER,
    Gurmukhi TEXT, Visraam TEXT, GurmukhiUni TEXT, Translations TEXT,
    PageNo INTEGER, LineNo INTEGER, SourceID INTEGER, Transliterations TEXT,
    WriterID INTEGER, RaagID INTEGER, Updated TEXT
);
";

/// Fixture database; the directory is removed on drop
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keertan.sqlite");

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        seed(&conn);

        Self { _dir: dir, path }
    }

    pub fn pool(&self, pool_size: usize) -> SqlitePool {
        SqlitePool::open(SqlitePoolConfig::new(&self.path).with_pool_size(pool_size)).unwrap()
    }

    pub fn handler(&self, options: QueryOptions) -> KeertanHandler {
        KeertanHandler::new(Arc::new(self.pool(2)), options)
    }

    /// Router with the default HTTP configuration (`/v2` base path)
    pub fn router(&self, options: QueryOptions) -> Router {
        self.router_with(options, &HttpServerConfig::default())
    }

    pub fn router_with(&self, options: QueryOptions, config: &HttpServerConfig) -> Router {
        HttpServer::new(self.handler(options), config, Environment::Development).router()
    }

    /// Open a writable connection for tests that change the data
    pub fn writer(&self) -> Connection {
        Connection::open(&self.path).unwrap()
    }
}

fn seed(conn: &Connection) {
    conn.execute(
        "INSERT INTO Writer VALUES (1, 'Guru Nanak Dev Ji', 'gurU nwnk dyv jI', 'ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO Raag VALUES (3, 'rwgu Awsw', 'ਰਾਗੁ ਆਸਾ', 'Raag Aasaa', 'Aasaa (347-488)')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO Source VALUES (1, 'sRI gurU gRMQ swihb jI', 'ਸ੍ਰੀ ਗੁਰੂ ਗ੍ਰੰਥ ਸਾਹਿਬ ਜੀ', 'Sri Guru Granth Sahib Ji')",
        [],
    )
    .unwrap();

    for (id, gurmukhi, english) in [(7, "Awsw dI vwr", "Aasaa Di Vaar"), (8, "rihrwis", "Rehras")] {
        conn.execute(
            "INSERT INTO AKHeaders VALUES (?1, ?2, NULL, ?3, '{\"en\":\"x\"}', ?4)",
            params![id, gurmukhi, format!("{{\"en\":\"{}\"}}", english), BASELINE_UPDATE],
        )
        .unwrap();
    }

    // (IndexID, HeaderID, ShabadID, VerseID, Page)
    let index = [
        (5, 7, 1, 105, 1),
        (3, 7, 1, 103, 1),
        (1, 7, 1, 101, 1),
        (7, 99, 3, 301, 3),
        (2, 7, 1, 102, 1),
        (6, 8, 2, 201, 2),
        (4, 7, 1, 104, 1),
    ];
    for (index_id, header_id, shabad_id, verse_id, page) in index {
        conn.execute(
            "INSERT INTO AKIndex VALUES (?1, ?2, ?3, ?4, ?5)",
            params![index_id, header_id, shabad_id, verse_id, page],
        )
        .unwrap();

        let writer: Option<i64> = if verse_id == 201 { None } else { Some(1) };
        let updated = if verse_id == 105 { LATE_UPDATE } else { BASELINE_UPDATE };
        let gurmukhi = format!("pMgiq {}", verse_id);
        let translations = format!("{{\"en\":{{\"bdb\":\"Line {}\"}}}}", verse_id);

        conn.execute(
            "INSERT INTO Verse VALUES (?1, ?2, NULL, NULL, ?3, 463, ?4, 1, NULL, ?5, 3, ?6)",
            params![verse_id, gurmukhi, translations, index_id, writer, updated],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO mv_AK_Shabad VALUES (?1, ?2, ?3, NULL, NULL, ?4, 463, ?5, 1, NULL, ?6, 3, ?7)",
            params![verse_id, index_id, gurmukhi, translations, index_id, writer, updated],
        )
        .unwrap();
    }
}

/// Issue a GET and return status, `Cache-Control` and the JSON body
pub async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, cache_control, body)
}

/// Values of `field` across a JSON array
pub fn column(rows: &Value, field: &str) -> Vec<Value> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|row| row[field].clone())
        .collect()
}
