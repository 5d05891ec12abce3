//! Error types for the Plumage query model
//!
//! This module defines all error types raised while building and validating
//! vector queries. We use `thiserror` for automatic `Display` and `Error`
//! trait implementations.

use thiserror::Error;

/// Result type alias for query-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for query construction and result handling
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A feature group carrying an embedding index appears in more than one join
    #[error("feature group '{group}' with an embedding index is joined more than once")]
    DuplicateEmbeddingJoin {
        /// Offending feature group name
        group: String,
    },

    /// The query selects no feature backed by an embedding index
    #[error("no embedding feature is defined in the query")]
    NoEmbeddingFeature,

    /// More than one embedding feature is selected and none was named explicitly
    #[error("{count} embedding features are defined in the query; name the one to search")]
    AmbiguousEmbeddingFeature {
        /// Number of candidate embedding features
        count: usize,
    },

    /// The explicitly named feature is not backed by an embedding index
    #[error("feature '{feature}' is not an embedding feature of the query")]
    NotEmbeddingFeature {
        /// Feature name as given by the caller
        feature: String,
    },

    /// A filter references a feature outside the feature group being searched
    #[error("filter feature '{feature}' does not belong to feature group '{group}' (version {version})")]
    FilterOutsideEmbeddingGroup {
        /// Feature name referenced by the filter
        feature: String,
        /// Feature group the search runs against
        group: String,
        /// Feature group version
        version: u32,
    },

    /// The feature group has no embedding index to search or read from
    #[error("feature group '{group}' does not have an embedding index")]
    NoEmbeddingIndex {
        /// Feature group name
        group: String,
    },

    /// A declared primary-key column is missing from the feature group's features
    #[error("primary key '{column}' is not a feature of feature group '{group}'")]
    MissingPrimaryKey {
        /// Feature group name
        group: String,
        /// Primary-key column name
        column: String,
    },

    /// The feature group declares no primary key at all
    #[error("feature group '{group}' has no primary key")]
    NoPrimaryKey {
        /// Feature group name
        group: String,
    },

    /// A read without keys needs an explicit primary-key column
    #[error("a primary key column is required when no keys are given")]
    PrimaryKeyRequired,

    /// No serving keys are registered under the requested join index
    #[error("no serving keys are defined for join index {index}")]
    UnknownJoinIndex {
        /// Join position as requested by the caller
        index: usize,
    },

    /// A returned or requested column has no mapping in the query
    #[error("feature '{column}' is not found in the query")]
    ColumnNotFound {
        /// Column name as returned by the index or given by the caller
        column: String,
    },

    /// A raw column value cannot be converted to its declared feature type
    #[error("invalid value for column '{column}': {reason}")]
    InvalidValue {
        /// Column the value belongs to
        column: String,
        /// Human-readable conversion failure
        reason: String,
    },
}
