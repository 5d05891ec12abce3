//! Embedding-index metadata
//!
//! This module defines:
//! - SimilarityFunction: distance measure an embedding column is indexed with
//! - EmbeddingFeature: one vector-indexed column
//! - EmbeddingIndex: the vector-database index backing a feature group
//!
//! A feature group with an `EmbeddingIndex` has its rows mirrored into a
//! vector-database index. When several groups of a project share one index,
//! their columns are disambiguated there by a per-group column prefix; a
//! group with a dedicated index uses no prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance measure used for approximate nearest-neighbor search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityFunction {
    /// Euclidean distance
    #[default]
    #[serde(rename = "l2_norm")]
    L2,
    /// Cosine similarity
    Cosine,
    /// Inner product
    DotProduct,
}

impl SimilarityFunction {
    /// Wire name understood by the vector database
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityFunction::L2 => "l2_norm",
            SimilarityFunction::Cosine => "cosine",
            SimilarityFunction::DotProduct => "dot_product",
        }
    }
}

impl fmt::Display for SimilarityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vector-indexed column of a feature group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingFeature {
    /// Column name within the feature group
    pub name: String,
    /// Number of vector dimensions
    pub dimension: u32,
    /// Distance measure the column is indexed with
    pub similarity_function: SimilarityFunction,
}

impl EmbeddingFeature {
    /// Create an embedding feature with the default similarity function
    pub fn new(name: impl Into<String>, dimension: u32) -> Self {
        Self {
            name: name.into(),
            dimension,
            similarity_function: SimilarityFunction::default(),
        }
    }

    /// Set the similarity function
    pub fn with_similarity(mut self, similarity: SimilarityFunction) -> Self {
        self.similarity_function = similarity;
        self
    }
}

/// Vector-database index metadata attached to a feature group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingIndex {
    /// Name of the index in the vector database
    pub index_name: String,
    /// Prefix applied to every column of the owning group inside the index.
    /// Empty for a dedicated index.
    pub col_prefix: String,
    /// The vector-indexed columns
    pub features: Vec<EmbeddingFeature>,
}

impl EmbeddingIndex {
    /// Create index metadata for a dedicated (unshared, unprefixed) index
    pub fn new(index_name: impl Into<String>, features: Vec<EmbeddingFeature>) -> Self {
        Self {
            index_name: index_name.into(),
            col_prefix: String::new(),
            features,
        }
    }

    /// Set the column prefix used inside a shared project index
    pub fn with_col_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.col_prefix = prefix.into();
        self
    }

    /// Register another vector-indexed column
    pub fn add_feature(&mut self, feature: EmbeddingFeature) {
        self.features.push(feature);
    }

    /// Whether this group shares a project-wide index.
    ///
    /// Shared indexes hold documents of many groups, so a search for one
    /// group can match documents that lack its columns entirely.
    pub fn is_shared(&self) -> bool {
        !self.col_prefix.is_empty()
    }

    /// Look up an embedding feature by column name
    pub fn feature(&self, name: &str) -> Option<&EmbeddingFeature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Physical column name of a feature inside the index
    pub fn physical_column(&self, name: &str) -> String {
        format!("{}{}", self.col_prefix, name)
    }
}
