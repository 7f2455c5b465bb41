//! # Rows and Bound Values
//!
//! Driver-neutral representations of query input and output.

use std::sync::Arc;

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqliteValue, ValueRef};

use super::errors::{StoreError, StoreResult};

/// A single SQL value, either bound as a parameter or read from a row
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Real(_) => "REAL",
            SqlValue::Text(_) => "TEXT",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(SqliteValue::Null),
            SqlValue::Integer(n) => ToSqlOutput::Owned(SqliteValue::Integer(*n)),
            SqlValue::Real(r) => ToSqlOutput::Owned(SqliteValue::Real(*r)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl<'a> From<ValueRef<'a>> for SqlValue {
    fn from(value: ValueRef<'a>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(n) => SqlValue::Integer(n),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            // No blob columns exist in the schema; expose them lossily as text.
            ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

/// A parameterized statement and its bound arguments, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    sql: String,
    params: Vec<SqlValue>,
}

impl BoundQuery {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Number of `?` placeholders in the statement text
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// One result row: column names shared across the result set, values by position
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SqlValue)>,
    {
        let (columns, values): (Vec<String>, Vec<SqlValue>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self::new(columns.into(), values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value of a column, or `None` if the row has no such column
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    fn require(&self, column: &str) -> StoreResult<&SqlValue> {
        self.get(column)
            .ok_or_else(|| StoreError::decode(format!("missing column {}", column)))
    }

    /// Non-null integer column
    pub fn int(&self, column: &str) -> StoreResult<i64> {
        self.opt_int(column)?
            .ok_or_else(|| StoreError::decode(format!("column {} is NULL", column)))
    }

    /// Nullable integer column. Numeric text is accepted.
    pub fn opt_int(&self, column: &str) -> StoreResult<Option<i64>> {
        match self.require(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(n) => Ok(Some(*n)),
            SqlValue::Text(s) => s.trim().parse().map(Some).map_err(|_| {
                StoreError::decode(format!("column {} is not an integer: {:?}", column, s))
            }),
            other => Err(StoreError::decode(format!(
                "column {} has type {}, expected INTEGER",
                column,
                other.type_name()
            ))),
        }
    }

    /// Nullable text column. Numbers are rendered as text.
    pub fn opt_text(&self, column: &str) -> StoreResult<Option<String>> {
        match self.require(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(s) => Ok(Some(s.clone())),
            SqlValue::Integer(n) => Ok(Some(n.to_string())),
            SqlValue::Real(r) => Ok(Some(r.to_string())),
        }
    }
}
