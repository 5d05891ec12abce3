//! Engine error type
//!
//! Query-model errors and index errors keep their own types in their own
//! crates; this module folds them into one enum so every client method
//! returns a single `Result`.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Any failure surfaced by the query engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Query construction or result reconciliation failed
    #[error(transparent)]
    Query(#[from] plumage_core::Error),

    /// The vector index failed or rejected a request
    #[error(transparent)]
    Index(#[from] plumage_index::IndexError),
}
