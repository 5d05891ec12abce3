//! The metadata-registry seam
//!
//! The view engine persists no state of its own; feature-view and
//! training-dataset metadata live in a remote registry. The registry sits
//! behind a trait so the engine stays testable and transport agnostic.
//! Production deployments implement it over the metadata service's REST
//! API.

use plumage_core::query::Query;
use plumage_core::view::{FeatureView, TrainingDatasetMeta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors surfaced by a feature-view registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No feature view matches the name, or the name and version
    #[error("feature view '{name}' was not found")]
    ViewNotFound {
        /// Requested view name
        name: String,
        /// Requested version, `None` when looked up by name alone
        version: Option<u32>,
    },

    /// The view exists but has no dataset of the requested version
    #[error("training dataset version {version} of feature view '{name}' was not found")]
    TrainingDatasetNotFound {
        /// View name
        name: String,
        /// Requested dataset version
        version: u32,
    },

    /// The registry failed or rejected the request
    #[error("registry error: {0}")]
    Remote(String),
}

/// A transformation function attached to one view column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedTransformation {
    /// Column the function applies to
    pub name: String,
    /// Source of the transformation function
    pub transformation_function: String,
}

/// Trait for feature-view metadata registries
///
/// Version arguments always refer to the view version; dataset versions are
/// passed separately. Implementations must tolerate concurrent calls.
pub trait FeatureViewRegistry: Send + Sync {
    /// Persist a new feature view
    fn create(&self, view: &FeatureView) -> RegistryResult<FeatureView>;

    /// All versions of a view, by name
    fn get_by_name(&self, name: &str) -> RegistryResult<Vec<FeatureView>>;

    /// One version of a view
    fn get_by_name_version(&self, name: &str, version: u32) -> RegistryResult<FeatureView>;

    /// Delete every version of a view
    fn delete_by_name(&self, name: &str) -> RegistryResult<()>;

    /// Delete one version of a view
    fn delete_by_name_version(&self, name: &str, version: u32) -> RegistryResult<()>;

    /// Transformation functions attached to a view's columns
    fn get_attached_transformations(
        &self,
        name: &str,
        version: u32,
    ) -> RegistryResult<Vec<AttachedTransformation>>;

    /// Metadata of one materialized training dataset
    fn get_training_dataset(
        &self,
        name: &str,
        version: u32,
        dataset_version: u32,
    ) -> RegistryResult<TrainingDatasetMeta>;

    /// Register a training-dataset materialization
    fn create_training_dataset(
        &self,
        name: &str,
        version: u32,
        dataset: &TrainingDatasetMeta,
    ) -> RegistryResult<TrainingDatasetMeta>;

    /// The view's query restricted to an event-time range
    fn get_batch_query(
        &self,
        name: &str,
        version: u32,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> RegistryResult<Query>;
}
