//! # Filter Predicates
//!
//! Composable WHERE-clause predicates for the read queries.
//!
//! Column identifiers are `&'static str`, so only the bound values can come
//! from a request. Every value becomes a `?` placeholder; nothing is ever
//! interpolated into the statement text.

use crate::store::SqlValue;

/// Always-true predicate every WHERE clause starts from
pub const BASE_PREDICATE: &str = "1 = 1";

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Strictly greater than
    Gt,
}

impl FilterOperator {
    /// SQL comparison token
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Gt => ">",
        }
    }
}

/// A single `column <op> ?` predicate and its bound value
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    /// Qualified column, e.g. `b.HeaderID`
    pub column: &'static str,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value bound to the placeholder
    pub value: SqlValue,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(column: &'static str, operator: FilterOperator, value: impl Into<SqlValue>) -> Self {
        Self {
            column,
            operator,
            value: value.into(),
        }
    }

    /// Create an equality filter
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, FilterOperator::Eq, value)
    }

    /// Create a greater than filter
    pub fn gt(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, FilterOperator::Gt, value)
    }

    /// Render as SQL with a single placeholder
    pub fn clause(&self) -> String {
        format!("{} {} ?", self.column, self.operator.as_sql())
    }
}

/// A set of filters combined with AND logic, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append the filter only when present
    pub fn and_maybe(self, filter: Option<FilterExpr>) -> Self {
        match filter {
            Some(f) => self.and(f),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// `WHERE 1 = 1 [AND <clause>]...`
    pub fn where_clause(&self) -> String {
        let mut sql = format!("WHERE {}", BASE_PREDICATE);
        for filter in &self.filters {
            sql.push_str(" AND ");
            sql.push_str(&filter.clause());
        }
        sql
    }

    /// Bound values, left to right in clause order
    pub fn into_params(self) -> Vec<SqlValue> {
        self.filters.into_iter().map(|f| f.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_tautology() {
        let filters = FilterSet::new();
        assert!(filters.is_empty());
        assert_eq!(filters.where_clause(), "WHERE 1 = 1");
        assert!(filters.into_params().is_empty());
    }

    #[test]
    fn test_clause_rendering() {
        assert_eq!(FilterExpr::eq("b.HeaderID", 4i64).clause(), "b.HeaderID = ?");
        assert_eq!(
            FilterExpr::gt("v.Updated", "2020-01-01 00:00:00").clause(),
            "v.Updated > ?"
        );
    }

    #[test]
    fn test_filter_set_keeps_order() {
        let filters = FilterSet::new()
            .and(FilterExpr::eq("aki.ShabadID", 9i64))
            .and_maybe(None)
            .and_maybe(Some(FilterExpr::gt("v.Updated", "2021-05-01 00:00:00")));

        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters.where_clause(),
            "WHERE 1 = 1 AND aki.ShabadID = ? AND v.Updated > ?"
        );
        assert_eq!(
            filters.into_params(),
            vec![
                SqlValue::Integer(9),
                SqlValue::Text("2021-05-01 00:00:00".to_string())
            ]
        );
    }

    #[test]
    fn test_hostile_value_stays_bound() {
        let filters = FilterSet::new().and(FilterExpr::gt("v.Updated", "1' OR '1'='1"));
        let sql = filters.where_clause();
        assert!(!sql.contains("OR"));
        assert_eq!(sql.matches('?').count(), 1);
    }
}
