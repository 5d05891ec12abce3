//! The vector-index backend seam
//!
//! The query engine never talks to the vector database directly; it goes
//! through [`VectorIndexBackend`]. Production deployments implement it over
//! an HTTP transport, and tests substitute the scripted double from
//! [`crate::testing`]. Requests cross the seam as already-built JSON bodies
//! so the trait stays object safe and transport agnostic.

use crate::error::Result;
use crate::response::SearchResponse;
use serde_json::Value as JsonValue;

/// Trait for swappable vector-index transports
///
/// Implementations must tolerate concurrent calls; the engine shares one
/// backend across threads behind an `Arc`.
pub trait VectorIndexBackend: Send + Sync {
    /// Execute a search request against the named index
    fn search(&self, index: &str, body: &JsonValue) -> Result<SearchResponse>;

    /// Count the documents matching a query body in the named index
    fn count(&self, index: &str, body: &JsonValue) -> Result<u64>;
}
