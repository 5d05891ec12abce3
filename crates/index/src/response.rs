//! Typed search responses
//!
//! Mirrors the slice of the vector database's response envelope the engine
//! consumes: the hit list with per-hit score and `_source` columns. Unknown
//! response fields are ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score; nearest-neighbor scores fall in `(0, 1]`
    #[serde(rename = "_score")]
    pub score: f64,
    /// Projected columns of the document, keyed by physical column name
    #[serde(rename = "_source")]
    pub source: serde_json::Map<String, JsonValue>,
}

/// Total-hit count reported alongside the hit list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalHits {
    /// Number of matching documents
    pub value: u64,
}

/// Hit list plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitList {
    /// Total-hit count, absent when the index does not track it
    #[serde(default)]
    pub total: Option<TotalHits>,
    /// Matching documents in score order
    pub hits: Vec<SearchHit>,
}

/// A complete search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The hit envelope
    pub hits: HitList,
}

impl SearchResponse {
    /// Build a response from hits alone, totals omitted
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: HitList { total: None, hits },
        }
    }

    /// The matching documents in score order
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits.hits
    }

    /// Number of matching documents returned
    pub fn len(&self) -> usize {
        self.hits.hits.len()
    }

    /// Whether no documents matched
    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }
}
