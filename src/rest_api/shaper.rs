//! # Row Shaping
//!
//! Decodes flat joined rows into a typed intermediate and shapes that into the
//! client-facing views. Decoding can fail (missing column, bad JSON); shaping
//! cannot and is a pure function of its input.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::{Row, StoreError, StoreResult};

/// Decode a JSON text column. NULL or blank text becomes `default`.
fn json_column(row: &Row, column: &str, default: Value) -> StoreResult<Value> {
    match row.opt_text(column)? {
        None => Ok(default),
        Some(text) if text.trim().is_empty() => Ok(default),
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| StoreError::decode(format!("column {} is not valid JSON: {}", column, e))),
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Verse text fields shared by both shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseText {
    #[serde(rename = "Gurmukhi")]
    pub gurmukhi: Option<String>,

    #[serde(rename = "GurmukhiUni")]
    pub gurmukhi_uni: Option<String>,

    #[serde(rename = "Visraam")]
    pub visraam: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriterRef {
    #[serde(rename = "WriterID")]
    pub id: i64,
    #[serde(rename = "WriterEnglish")]
    pub english: Option<String>,
    #[serde(rename = "WriterGurmukhi")]
    pub gurmukhi: Option<String>,
    #[serde(rename = "WriterUnicode")]
    pub unicode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaagRef {
    #[serde(rename = "RaagID")]
    pub id: i64,
    #[serde(rename = "RaagGurmukhi")]
    pub gurmukhi: Option<String>,
    #[serde(rename = "RaagUnicode")]
    pub unicode: Option<String>,
    #[serde(rename = "RaagEnglish")]
    pub english: Option<String>,
    #[serde(rename = "RaagWithPage")]
    pub with_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    #[serde(rename = "SourceID")]
    pub id: i64,
    #[serde(rename = "SourceGurmukhi")]
    pub gurmukhi: Option<String>,
    #[serde(rename = "SourceUnicode")]
    pub unicode: Option<String>,
    #[serde(rename = "SourceEnglish")]
    pub english: Option<String>,
}

/// One row of either joined view, decoded
///
/// Writer/Raag/Source are `None` when the verse has no such id or the LEFT
/// JOIN found nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub index_id: Option<i64>,
    pub header_id: Option<i64>,
    pub shabad_id: Option<i64>,
    pub verse_id: Option<i64>,
    pub page_no: Option<i64>,
    pub ang: Option<i64>,
    pub line_no: Option<i64>,
    pub text: VerseText,
    pub translations: Value,
    pub transliterations: Value,
    pub writer: Option<WriterRef>,
    pub raag: Option<RaagRef>,
    pub source: Option<SourceRef>,
    pub updated: Option<String>,
}

impl JoinedRow {
    pub fn decode(row: &Row) -> StoreResult<Self> {
        let writer = row
            .opt_int("WriterID")?
            .map(|id| -> StoreResult<WriterRef> {
                Ok(WriterRef {
                    id,
                    english: row.opt_text("WriterEnglish")?,
                    gurmukhi: row.opt_text("WriterGurmukhi")?,
                    unicode: row.opt_text("WriterUnicode")?,
                })
            })
            .transpose()?;

        let raag = row
            .opt_int("RaagID")?
            .map(|id| -> StoreResult<RaagRef> {
                Ok(RaagRef {
                    id,
                    gurmukhi: row.opt_text("RaagGurmukhi")?,
                    unicode: row.opt_text("RaagUnicode")?,
                    english: row.opt_text("RaagEnglish")?,
                    with_page: row.opt_text("RaagWithPage")?,
                })
            })
            .transpose()?;

        let source = row
            .opt_int("SourceID")?
            .map(|id| -> StoreResult<SourceRef> {
                Ok(SourceRef {
                    id,
                    gurmukhi: row.opt_text("SourceGurmukhi")?,
                    unicode: row.opt_text("SourceUnicode")?,
                    english: row.opt_text("SourceEnglish")?,
                })
            })
            .transpose()?;

        Ok(Self {
            index_id: row.opt_int("IndexID")?,
            header_id: row.opt_int("HeaderID")?,
            shabad_id: row.opt_int("ShabadID")?,
            verse_id: row.opt_int("VerseID")?,
            page_no: row.opt_int("PageNo")?,
            ang: row.opt_int("Ang")?,
            line_no: row.opt_int("LineNo")?,
            text: VerseText {
                gurmukhi: row.opt_text("Gurmukhi")?,
                gurmukhi_uni: row.opt_text("GurmukhiUni")?,
                visraam: json_column(row, "Visraam", Value::Null)?,
            },
            translations: json_column(row, "Translations", empty_object())?,
            transliterations: json_column(row, "Transliterations", empty_object())?,
            writer,
            raag,
            source,
            updated: row.opt_text("Updated")?,
        })
    }

    pub fn shape(&self, shape: RowShape) -> ShapedRow {
        match shape {
            RowShape::IndexEntry => ShapedRow::IndexEntry(self.to_index_entry()),
            RowShape::Verse => ShapedRow::Verse(self.to_verse()),
        }
    }

    pub fn to_index_entry(&self) -> IndexEntryView {
        IndexEntryView {
            index_id: self.index_id,
            header_id: self.header_id,
            shabad_id: self.shabad_id,
            verse_id: self.verse_id,
            page_no: self.page_no,
            ang: self.ang,
            line_no: self.line_no,
            verse: self.text.clone(),
            translations: self.translations.clone(),
            transliterations: self.transliterations.clone(),
            writer: self.writer.clone(),
            raag: self.raag.clone(),
            source: self.source.clone(),
            updated: self.updated.clone(),
        }
    }

    pub fn to_verse(&self) -> VerseView {
        VerseView {
            verse_id: self.verse_id,
            shabad_id: self.shabad_id,
            index_id: self.index_id,
            header_id: self.header_id,
            verse: self.text.clone(),
            translations: self.translations.clone(),
            transliterations: self.transliterations.clone(),
            page_no: self.page_no,
            line_no: self.line_no,
            writer: self.writer.clone(),
            raag: self.raag.clone(),
            source: self.source.clone(),
            updated: self.updated.clone(),
        }
    }
}

/// Which view a joined row is shaped into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    IndexEntry,
    Verse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShapedRow {
    IndexEntry(IndexEntryView),
    Verse(VerseView),
}

/// An index listing entry. `PageNo` is the index page, `Ang` the verse's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntryView {
    #[serde(rename = "IndexID")]
    pub index_id: Option<i64>,
    #[serde(rename = "HeaderID")]
    pub header_id: Option<i64>,
    #[serde(rename = "ShabadID")]
    pub shabad_id: Option<i64>,
    #[serde(rename = "VerseID")]
    pub verse_id: Option<i64>,
    #[serde(rename = "PageNo")]
    pub page_no: Option<i64>,
    #[serde(rename = "Ang")]
    pub ang: Option<i64>,
    #[serde(rename = "LineNo")]
    pub line_no: Option<i64>,
    #[serde(rename = "Verse")]
    pub verse: VerseText,
    #[serde(rename = "Translations")]
    pub translations: Value,
    #[serde(rename = "Transliterations")]
    pub transliterations: Value,
    #[serde(rename = "Writer")]
    pub writer: Option<WriterRef>,
    #[serde(rename = "Raag")]
    pub raag: Option<RaagRef>,
    #[serde(rename = "Source")]
    pub source: Option<SourceRef>,
    #[serde(rename = "Updated")]
    pub updated: Option<String>,
}

/// A verse of a shabad
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseView {
    #[serde(rename = "VerseID")]
    pub verse_id: Option<i64>,
    #[serde(rename = "ShabadID")]
    pub shabad_id: Option<i64>,
    #[serde(rename = "IndexID")]
    pub index_id: Option<i64>,
    #[serde(rename = "HeaderID")]
    pub header_id: Option<i64>,
    #[serde(rename = "Verse")]
    pub verse: VerseText,
    #[serde(rename = "Translations")]
    pub translations: Value,
    #[serde(rename = "Transliterations")]
    pub transliterations: Value,
    #[serde(rename = "PageNo")]
    pub page_no: Option<i64>,
    #[serde(rename = "LineNo")]
    pub line_no: Option<i64>,
    #[serde(rename = "Writer")]
    pub writer: Option<WriterRef>,
    #[serde(rename = "Raag")]
    pub raag: Option<RaagRef>,
    #[serde(rename = "Source")]
    pub source: Option<SourceRef>,
    #[serde(rename = "Updated")]
    pub updated: Option<String>,
}

/// A section header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    #[serde(rename = "HeaderID")]
    pub header_id: i64,
    #[serde(rename = "Gurmukhi")]
    pub gurmukhi: Option<String>,
    #[serde(rename = "GurmukhiUni")]
    pub gurmukhi_uni: Option<String>,
    #[serde(rename = "Translations")]
    pub translations: Value,
    #[serde(rename = "Transliterations")]
    pub transliterations: Value,
    #[serde(rename = "Updated")]
    pub updated: Option<String>,
}

impl HeaderView {
    pub fn decode(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            header_id: row.int("HeaderID")?,
            gurmukhi: row.opt_text("Gurmukhi")?,
            gurmukhi_uni: row.opt_text("GurmukhiUni")?,
            translations: json_column(row, "Translations", empty_object())?,
            transliterations: json_column(row, "Transliterations", empty_object())?,
            updated: row.opt_text("Updated")?,
        })
    }
}

/// Decode and shape every row, preserving order
pub fn shape_rows(rows: &[Row], shape: RowShape) -> StoreResult<Vec<ShapedRow>> {
    rows.iter()
        .map(|row| JoinedRow::decode(row).map(|joined| joined.shape(shape)))
        .collect()
}

/// Decode header rows, preserving order
pub fn shape_headers(rows: &[Row]) -> StoreResult<Vec<HeaderView>> {
    rows.iter().map(HeaderView::decode).collect()
}
