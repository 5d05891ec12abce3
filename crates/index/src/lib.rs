//! Vector-index access layer for Plumage
//!
//! This crate owns everything that crosses the wire to the vector database:
//! - dsl: builders for the OpenSearch-style JSON query language
//! - response: typed search responses
//! - client: the [`VectorIndexBackend`] transport seam
//! - error: index-side error taxonomy
//! - testing: a scripted backend for tests
//!
//! It has no knowledge of feature-store metadata; the engine crate maps
//! feature queries onto these building blocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod client;
pub mod dsl;
pub mod error;
pub mod response;
pub mod testing;

// Re-export commonly used types at the crate root
pub use client::VectorIndexBackend;
pub use error::{IndexError, Result};
pub use response::{HitList, SearchHit, SearchResponse, TotalHits};
