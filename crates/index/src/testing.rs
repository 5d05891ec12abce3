//! Test doubles for the vector-index seam
//!
//! [`ScriptedIndex`] replays a queue of canned responses and records every
//! request body it receives, so tests can assert both on the wire shape the
//! engine produced and on how the engine reacted to each response. It backs
//! the engine's unit tests and the workspace integration tests; production
//! code never constructs it.

use crate::client::VectorIndexBackend;
use crate::error::{IndexError, Result};
use crate::response::{SearchHit, SearchResponse};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Index name the request targeted
    pub index: String,
    /// Request body exactly as received
    pub body: JsonValue,
}

/// A backend that replays scripted responses in order
///
/// Each `search` call consumes the next scripted search outcome; each
/// `count` call consumes the next scripted count. Running past the script
/// fails the call with a transport error, which makes an over-consuming
/// engine visible in tests.
#[derive(Debug, Default)]
pub struct ScriptedIndex {
    searches: Mutex<VecDeque<Result<SearchResponse>>>,
    counts: Mutex<VecDeque<Result<u64>>>,
    search_calls: Mutex<Vec<RecordedCall>>,
    count_calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedIndex {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful search response
    pub fn enqueue_response(&self, response: SearchResponse) {
        self.searches.lock().push_back(Ok(response));
    }

    /// Queue a successful search response built from hits
    pub fn enqueue_hits(&self, hits: Vec<SearchHit>) {
        self.enqueue_response(SearchResponse::from_hits(hits));
    }

    /// Queue a failing search
    pub fn enqueue_error(&self, error: IndexError) {
        self.searches.lock().push_back(Err(error));
    }

    /// Queue a count result
    pub fn enqueue_count(&self, count: u64) {
        self.counts.lock().push_back(Ok(count));
    }

    /// Queue a failing count
    pub fn enqueue_count_error(&self, error: IndexError) {
        self.counts.lock().push_back(Err(error));
    }

    /// All search requests received so far, in call order
    pub fn search_calls(&self) -> Vec<RecordedCall> {
        self.search_calls.lock().clone()
    }

    /// All count requests received so far, in call order
    pub fn count_calls(&self) -> Vec<RecordedCall> {
        self.count_calls.lock().clone()
    }

    /// Number of scripted search outcomes not yet consumed
    pub fn remaining_searches(&self) -> usize {
        self.searches.lock().len()
    }
}

impl VectorIndexBackend for ScriptedIndex {
    fn search(&self, index: &str, body: &JsonValue) -> Result<SearchResponse> {
        self.search_calls.lock().push(RecordedCall {
            index: index.to_string(),
            body: body.clone(),
        });
        self.searches
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(IndexError::Transport("script exhausted".to_string())))
    }

    fn count(&self, index: &str, body: &JsonValue) -> Result<u64> {
        self.count_calls.lock().push(RecordedCall {
            index: index.to_string(),
            body: body.clone(),
        });
        self.counts
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(IndexError::Transport("script exhausted".to_string())))
    }
}

/// Build a hit from a score and a `_source` object
///
/// # Panics
/// Panics if `source` is not a JSON object. Test-only convenience.
pub fn hit(score: f64, source: JsonValue) -> SearchHit {
    match source {
        JsonValue::Object(map) => SearchHit { score, source: map },
        other => panic!("hit source must be a JSON object, got {other}"),
    }
}
