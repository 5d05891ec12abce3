//! Core types for the Plumage feature store client
//!
//! This crate defines the foundational types used throughout the system:
//! - FeatureGroup, Feature: versioned feature metadata
//! - EmbeddingIndex, EmbeddingFeature: vector-index metadata
//! - Query, Join: declarative feature selections
//! - FilterExpr: filter trees built with `&` and `|`
//! - ServingKey: primary keys required for online retrieval
//! - FeatureView, TrainingDatasetMeta: read interfaces and materializations
//! - Value, Row: typed result values
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod embedding;
pub mod error;
pub mod filter;
pub mod query;
pub mod serving_key;
pub mod types;
pub mod value;
pub mod view;

// Re-export commonly used types at the crate root
pub use embedding::{EmbeddingFeature, EmbeddingIndex, SimilarityFunction};
pub use error::{Error, Result};
pub use filter::{FilterCondition, FilterExpr, FilterOp};
pub use query::{Join, Query};
pub use serving_key::ServingKey;
pub use types::{Feature, FeatureGroup, FeatureGroupId, FeatureKind};
pub use value::{Row, Value};
pub use view::{
    FeatureView, TrainingDatasetFeature, TrainingDatasetMeta, TrainingDatasetSplit,
};
