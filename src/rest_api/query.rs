//! # Query Templates
//!
//! The two joined column sets and the statements built from them.
//!
//! - index view: one row per `AKIndex` entry, joined to its verse
//! - verse view: one row per verse of a shabad, joined back to `AKIndex`
//!
//! Both views expose the same column names, so one decoder reads either.

use crate::store::BoundQuery;

use super::filter::{FilterExpr, FilterSet};
use super::parser::SinceDate;

/// Columns and joins for index listings
pub const INDEX_COLUMNS: &str = "\
b.IndexID, b.HeaderID, b.ShabadID, b.VerseID, b.Page AS PageNo, \
v.Gurmukhi, v.Visraam, v.GurmukhiUni, v.Translations, v.PageNo AS Ang, v.LineNo, \
v.SourceID, v.Transliterations, \
v.WriterID, w.WriterEnglish, w.WriterGurmukhi, w.WriterUnicode, \
v.RaagID, r.RaagGurmukhi, r.RaagUnicode, r.RaagEnglish, r.RaagWithPage, \
src.SourceGurmukhi, src.SourceUnicode, src.SourceEnglish, \
v.Updated \
FROM AKIndex b \
LEFT JOIN Verse v ON b.VerseID = v.ID \
LEFT JOIN Writer w ON w.WriterID = v.WriterID \
LEFT JOIN Raag r ON r.RaagID = v.RaagID \
LEFT JOIN Source src ON src.SourceID = v.SourceID";

/// Columns and joins for the verses of a shabad
pub const VERSE_COLUMNS: &str = "\
aki.IndexID, aki.HeaderID, aki.ShabadID, v.VerseID, v.PageNo AS PageNo, \
v.Gurmukhi, v.Visraam, v.GurmukhiUni, v.Translations, v.PageNo AS Ang, v.LineNo, \
v.SourceID, v.Transliterations, \
v.WriterID, w.WriterEnglish, w.WriterGurmukhi, w.WriterUnicode, \
v.RaagID, r.RaagGurmukhi, r.RaagUnicode, r.RaagEnglish, r.RaagWithPage, \
src.SourceGurmukhi, src.SourceUnicode, src.SourceEnglish, \
v.Updated \
FROM mv_AK_Shabad v \
LEFT JOIN AKIndex aki ON aki.IndexID = v.IndexID \
LEFT JOIN Writer w ON w.WriterID = v.WriterID \
LEFT JOIN Raag r ON r.RaagID = v.RaagID \
LEFT JOIN Source src ON src.SourceID = v.SourceID";

/// Columns of `AKHeaders`
pub const HEADER_COLUMNS: &str =
    "HeaderID, Gurmukhi, GurmukhiUni, Translations, Transliterations, Updated FROM AKHeaders";

const INDEX_ORDER: &str = "ORDER BY b.IndexID ASC";
const VERSE_ORDER: &str = "ORDER BY aki.IndexID ASC, v.VerseID ASC";
const HEADER_ORDER: &str = "ORDER BY HeaderID ASC";

fn since_filter(column: &'static str, since: Option<&SinceDate>) -> Option<FilterExpr> {
    since.map(|date| FilterExpr::gt(column, date.to_sql_text()))
}

fn compose(columns: &str, filters: FilterSet, order: &str) -> BoundQuery {
    let sql = format!("SELECT {} {} {}", columns, filters.where_clause(), order);
    BoundQuery::new(sql, filters.into_params())
}

/// Index listing, optionally scoped to a header and/or to rows updated after a cutoff
pub fn index_query(header_id: Option<i64>, since: Option<&SinceDate>) -> BoundQuery {
    let filters = FilterSet::new()
        .and_maybe(header_id.map(|id| FilterExpr::eq("b.HeaderID", id)))
        .and_maybe(since_filter("v.Updated", since));

    compose(INDEX_COLUMNS, filters, INDEX_ORDER)
}

/// Verses of one shabad, optionally only those updated after a cutoff
pub fn shabad_query(shabad_id: i64, since: Option<&SinceDate>) -> BoundQuery {
    let filters = FilterSet::new()
        .and(FilterExpr::eq("aki.ShabadID", shabad_id))
        .and_maybe(since_filter("v.Updated", since));

    compose(VERSE_COLUMNS, filters, VERSE_ORDER)
}

/// Every header
pub fn headers_query() -> BoundQuery {
    compose(HEADER_COLUMNS, FilterSet::new(), HEADER_ORDER)
}

/// One header by id
pub fn header_query(header_id: i64) -> BoundQuery {
    let filters = FilterSet::new().and(FilterExpr::eq("HeaderID", header_id));
    compose(HEADER_COLUMNS, filters, HEADER_ORDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlValue;

    fn since() -> SinceDate {
        SinceDate::parse("2022-02-02 10:00:00").unwrap()
    }

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(s.to_string())
    }

    #[test]
    fn test_index_query_filter_combinations() {
        let cutoff = since();
        let cases: [(Option<i64>, Option<&SinceDate>, &str, Vec<SqlValue>); 4] = [
            (None, None, "WHERE 1 = 1 ORDER", vec![]),
            (
                Some(5),
                None,
                "WHERE 1 = 1 AND b.HeaderID = ? ORDER",
                vec![SqlValue::Integer(5)],
            ),
            (
                None,
                Some(&cutoff),
                "WHERE 1 = 1 AND v.Updated > ? ORDER",
                vec![text("2022-02-02 10:00:00")],
            ),
            (
                Some(5),
                Some(&cutoff),
                "WHERE 1 = 1 AND b.HeaderID = ? AND v.Updated > ? ORDER",
                vec![SqlValue::Integer(5), text("2022-02-02 10:00:00")],
            ),
        ];

        for (header, since, where_sql, params) in cases {
            let query = index_query(header, since);
            assert!(query.sql().contains(where_sql), "{}", query.sql());
            assert_eq!(query.params(), params.as_slice());
            assert_eq!(query.placeholder_count(), query.params().len());
            assert!(query.sql().ends_with("ORDER BY b.IndexID ASC"));
        }
    }

    #[test]
    fn test_shabad_query_binds_id_first() {
        let plain = shabad_query(12, None);
        assert_eq!(plain.params(), &[SqlValue::Integer(12)]);
        assert!(plain.sql().contains("WHERE 1 = 1 AND aki.ShabadID = ? ORDER"));

        let cutoff = since();
        let incremental = shabad_query(12, Some(&cutoff));
        assert_eq!(
            incremental.params(),
            &[SqlValue::Integer(12), text("2022-02-02 10:00:00")]
        );
        assert!(incremental.sql().ends_with("ORDER BY aki.IndexID ASC, v.VerseID ASC"));
    }

    #[test]
    fn test_header_queries() {
        let all = headers_query();
        assert!(all.params().is_empty());
        assert!(all.sql().starts_with("SELECT HeaderID, Gurmukhi"));
        assert!(all.sql().ends_with("ORDER BY HeaderID ASC"));

        let one = header_query(3);
        assert_eq!(one.params(), &[SqlValue::Integer(3)]);
        assert!(one.sql().contains("WHERE 1 = 1 AND HeaderID = ?"));
    }

    #[test]
    fn test_composition_is_stable() {
        let cutoff = since();
        assert_eq!(index_query(Some(1), Some(&cutoff)), index_query(Some(1), Some(&cutoff)));
        assert_eq!(shabad_query(1, None), shabad_query(1, None));
    }
}
