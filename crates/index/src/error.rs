//! Error types for vector-index access

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors surfaced by a vector-index backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The index rejected the search because `k` exceeds its configured
    /// result window. When the backend can extract the ceiling from the
    /// rejection it is carried in `max_k`.
    #[error("requested k is larger than the index allows (max k: {max_k:?})")]
    RequestedKTooLarge {
        /// Largest k the index accepts, when the rejection names it
        max_k: Option<u64>,
    },

    /// The index rejected the request as malformed or illegal
    #[error("index rejected the request: {reason}")]
    Rejected {
        /// Rejection reason reported by the index
        reason: String,
    },

    /// The index could not be reached or the transport failed mid-request
    #[error("index transport error: {0}")]
    Transport(String),
}
