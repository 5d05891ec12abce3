//! Serving keys for online retrieval
//!
//! A serving key names one primary-key column a caller must supply to fetch
//! a feature vector. Each key belongs to a join position of the view's
//! query. When two joined groups share a key column name, the colliding key
//! is exposed under a prefixed alias and `required_serving_key` keeps the
//! name the caller actually has to send.

use serde::{Deserialize, Serialize};

/// One primary-key column required to serve a feature vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingKey {
    /// Key column name within its feature group
    pub feature_name: String,
    /// Join position of the owning feature group, 0 for the left side
    pub join_index: usize,
    /// Prefix of the owning join, empty for the left side
    pub prefix: String,
    /// Whether the caller must supply this key
    pub required: bool,
    /// Alias the caller supplies when the plain name collides across joins
    pub required_serving_key: Option<String>,
}

impl ServingKey {
    /// Create a required serving key with no prefix or alias
    pub fn new(feature_name: impl Into<String>, join_index: usize) -> Self {
        Self {
            feature_name: feature_name.into(),
            join_index,
            prefix: String::new(),
            required: true,
            required_serving_key: None,
        }
    }

    /// Set the join prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Mark the key optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the alias callers use for this key
    pub fn with_required_serving_key(mut self, alias: impl Into<String>) -> Self {
        self.required_serving_key = Some(alias.into());
        self
    }

    /// Name the caller supplies: the alias when present, the plain name otherwise
    pub fn required_key(&self) -> &str {
        self.required_serving_key
            .as_deref()
            .unwrap_or(&self.feature_name)
    }
}
