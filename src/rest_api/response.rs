//! # Response Envelopes
//!
//! Success bodies for the three read operations.

use serde::Serialize;

use super::shaper::{HeaderView, ShapedRow};

/// `GET /headers`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadersResponse {
    pub headers: Vec<HeaderView>,
}

/// `GET /index` and `GET /index/{HeaderID}`
///
/// `header` is present only when the listing was filtered by header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<HeaderView>>,

    pub index: Vec<ShapedRow>,
}

impl IndexResponse {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// `GET /shabad/{ShabadID}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShabadResponse {
    pub header: Vec<HeaderView>,
    pub verses: Vec<ShapedRow>,
}
