//! Core types for the Plumage feature store client
//!
//! This module defines the foundational metadata types:
//! - FeatureGroupId: unique identifier for a feature group
//! - FeatureKind: coarse type classification driving result conversion
//! - Feature: a named, typed column of a feature group
//! - FeatureGroup: a versioned table of features with optional vector indexing

use crate::embedding::EmbeddingIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a feature group
///
/// Identifiers are assigned by the metadata service and stay stable across
/// client sessions. They key every per-group mapping in the query engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FeatureGroupId(u64);

impl FeatureGroupId {
    /// Create an identifier from its numeric form
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric form of this identifier
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeatureGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse classification of a feature's declared type
///
/// Only the classes the result rewriter distinguishes are kept; every other
/// declared type is `Scalar` and passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Calendar date, stored in the index as epoch milliseconds
    Date,
    /// Date and time, stored in the index as epoch milliseconds
    Timestamp,
    /// Raw bytes, stored in the index as base64 text
    Binary,
    /// Nested type (array, map or struct), stored in the index as base64 text
    Complex,
    /// Everything else; no conversion applies
    Scalar,
}

impl FeatureKind {
    /// Classify a declared type string such as `"timestamp"` or `"array<float>"`
    ///
    /// Matching is case-insensitive. Unrecognized types classify as `Scalar`.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        match lower.as_str() {
            "date" => FeatureKind::Date,
            "timestamp" => FeatureKind::Timestamp,
            "binary" => FeatureKind::Binary,
            _ if lower.starts_with("array")
                || lower.starts_with("map")
                || lower.starts_with("struct") =>
            {
                FeatureKind::Complex
            }
            _ => FeatureKind::Scalar,
        }
    }
}

/// A named column of a feature group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Column name, unique within its feature group
    pub name: String,
    /// Declared type string as the metadata service reports it
    #[serde(rename = "type")]
    pub feature_type: Option<String>,
    /// Owning feature group, stamped when the feature is attached
    pub feature_group_id: Option<FeatureGroupId>,
}

impl Feature {
    /// Create an untyped feature
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature_type: None,
            feature_group_id: None,
        }
    }

    /// Create a feature with a declared type string
    pub fn typed(name: impl Into<String>, feature_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature_type: Some(feature_type.into()),
            feature_group_id: None,
        }
    }

    /// Classify the declared type; untyped features classify as `Scalar`
    pub fn kind(&self) -> FeatureKind {
        self.feature_type
            .as_deref()
            .map(FeatureKind::parse)
            .unwrap_or(FeatureKind::Scalar)
    }
}

/// A versioned collection of features, optionally backed by a vector index
///
/// Feature groups are fetched from the metadata service; the builder methods
/// here exist for assembling them client-side and in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGroup {
    /// Stable identifier assigned by the metadata service
    pub id: FeatureGroupId,
    /// Feature group name
    pub name: String,
    /// Schema version
    pub version: u32,
    /// Primary-key column names, in declaration order
    pub primary_key: Vec<String>,
    /// All features of this group
    pub features: Vec<Feature>,
    /// Vector index metadata, present when any feature is embedded
    pub embedding_index: Option<EmbeddingIndex>,
}

impl FeatureGroup {
    /// Create an empty feature group
    pub fn new(id: FeatureGroupId, name: impl Into<String>, version: u32) -> Self {
        Self {
            id,
            name: name.into(),
            version,
            primary_key: Vec::new(),
            features: Vec::new(),
            embedding_index: None,
        }
    }

    /// Set the primary-key columns
    pub fn with_primary_key(mut self, columns: Vec<&str>) -> Self {
        self.primary_key = columns.into_iter().map(String::from).collect();
        self
    }

    /// Attach features, stamping each with this group's identifier
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features
            .into_iter()
            .map(|mut f| {
                f.feature_group_id = Some(self.id);
                f
            })
            .collect();
        self
    }

    /// Attach embedding-index metadata
    pub fn with_embedding_index(mut self, index: EmbeddingIndex) -> Self {
        self.embedding_index = Some(index);
        self
    }

    /// Look up a feature by name
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (version {})", self.name, self.version)
    }
}
