//! Feature views and training-dataset metadata
//!
//! A feature view is a named, versioned read interface over a [`Query`]. It
//! carries the output schema, which features serve as labels, and the
//! serving keys required for online retrieval. Training-dataset metadata
//! describes one materialization of a view.

use crate::query::Query;
use crate::serving_key::ServingKey;
use crate::types::FeatureKind;
use serde::{Deserialize, Serialize};

/// A column of a feature view's output schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDatasetFeature {
    /// Final column name, including any join prefix
    pub name: String,
    /// Declared type string as the metadata service reports it
    #[serde(rename = "type")]
    pub feature_type: Option<String>,
    /// Whether this column is a training label
    pub label: bool,
}

impl TrainingDatasetFeature {
    /// Create an untyped schema column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature_type: None,
            label: false,
        }
    }

    /// Create a label column
    pub fn label(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature_type: None,
            label: true,
        }
    }

    /// Set the declared type string
    pub fn with_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = Some(feature_type.into());
        self
    }

    /// Classify the declared type; untyped columns classify as `Scalar`
    pub fn kind(&self) -> FeatureKind {
        self.feature_type
            .as_deref()
            .map(FeatureKind::parse)
            .unwrap_or(FeatureKind::Scalar)
    }
}

/// A named, versioned read interface over a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureView {
    /// View name, unique per version
    pub name: String,
    /// View version
    pub version: u32,
    /// The query this view reads
    pub query: Query,
    /// Output schema in column order
    pub features: Vec<TrainingDatasetFeature>,
    /// Names of the label columns
    pub labels: Vec<String>,
    /// Keys required for online retrieval, when the service has derived them
    pub serving_keys: Option<Vec<ServingKey>>,
    /// Free-form description
    pub description: Option<String>,
}

impl FeatureView {
    /// Create a view over a query with an empty schema
    pub fn new(name: impl Into<String>, version: u32, query: Query) -> Self {
        Self {
            name: name.into(),
            version,
            query,
            features: Vec::new(),
            labels: Vec::new(),
            serving_keys: None,
            description: None,
        }
    }

    /// Set the output schema
    pub fn with_features(mut self, features: Vec<TrainingDatasetFeature>) -> Self {
        self.features = features;
        self
    }

    /// Set the label column names
    pub fn with_labels(mut self, labels: Vec<&str>) -> Self {
        self.labels = labels.into_iter().map(String::from).collect();
        self
    }

    /// Set the serving keys
    pub fn with_serving_keys(mut self, keys: Vec<ServingKey>) -> Self {
        self.serving_keys = Some(keys);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One split of a training dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDatasetSplit {
    /// Split name, e.g. `"train"` or `"test"`
    pub name: String,
    /// Fraction of rows in this split, when split randomly
    pub percentage: Option<f64>,
}

impl TrainingDatasetSplit {
    /// Create a split with a row fraction
    pub fn new(name: impl Into<String>, percentage: f64) -> Self {
        Self {
            name: name.into(),
            percentage: Some(percentage),
        }
    }
}

/// Metadata of one materialized training dataset of a view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDatasetMeta {
    /// Dataset version; assigned by the service when absent
    pub version: Option<u32>,
    /// Free-form description
    pub description: Option<String>,
    /// Storage format of the materialized files
    pub data_format: Option<String>,
    /// Storage location of the materialized files
    pub location: Option<String>,
    /// Event-time range start, epoch milliseconds
    pub start_time: Option<i64>,
    /// Event-time range end, epoch milliseconds
    pub end_time: Option<i64>,
    /// Declared splits, empty for an unsplit dataset
    pub splits: Vec<TrainingDatasetSplit>,
    /// Which split trains the model; defaulted when splits exist
    pub train_split: Option<String>,
    /// Random seed used when splitting
    pub seed: Option<u64>,
    /// Output schema copied from the view at creation time
    pub schema: Option<Vec<TrainingDatasetFeature>>,
}

impl TrainingDatasetMeta {
    /// Metadata for a new unsplit dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset version
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event-time range, epoch milliseconds
    pub fn with_time_range(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Set the declared splits
    pub fn with_splits(mut self, splits: Vec<TrainingDatasetSplit>) -> Self {
        self.splits = splits;
        self
    }

    /// Set the training split name
    pub fn with_train_split(mut self, name: impl Into<String>) -> Self {
        self.train_split = Some(name.into());
        self
    }
}
