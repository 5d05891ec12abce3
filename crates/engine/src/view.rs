//! Feature-view lifecycle operations
//!
//! Thin orchestration over a [`FeatureViewRegistry`]: persisting views,
//! looking them up, and managing training-dataset metadata. Dataframe
//! materialization is out of scope; callers take the batch query and run it
//! on their own compute.

use crate::registry::{FeatureViewRegistry, RegistryError, RegistryResult};
use plumage_core::query::Query;
use plumage_core::view::{FeatureView, TrainingDatasetFeature, TrainingDatasetMeta};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Split that trains the model when the caller declares none
pub const DEFAULT_TRAIN_SPLIT: &str = "train";

/// Lifecycle operations of feature views and their training datasets
#[derive(Debug)]
pub struct FeatureViewEngine<R> {
    registry: R,
}

impl<R: FeatureViewRegistry> FeatureViewEngine<R> {
    /// Build an engine over one registry
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Persist a feature view
    ///
    /// Label columns are part of the output schema, so a schema feature is
    /// appended for each declared label before the view is stored.
    pub fn save(&self, mut view: FeatureView) -> RegistryResult<FeatureView> {
        let labels = view.labels.clone();
        for label in labels {
            view.features.push(TrainingDatasetFeature::label(label));
        }
        debug!(view = %view.name, version = view.version, "saving feature view");
        self.registry.create(&view)
    }

    /// One version of a view
    pub fn get(&self, name: &str, version: u32) -> RegistryResult<FeatureView> {
        self.registry.get_by_name_version(name, version)
    }

    /// All versions of a view
    pub fn get_all(&self, name: &str) -> RegistryResult<Vec<FeatureView>> {
        self.registry.get_by_name(name)
    }

    /// Delete one version of a view
    pub fn delete(&self, name: &str, version: u32) -> RegistryResult<()> {
        debug!(view = name, version, "deleting feature view");
        self.registry.delete_by_name_version(name, version)
    }

    /// Delete every version of a view
    pub fn delete_all(&self, name: &str) -> RegistryResult<()> {
        debug!(view = name, "deleting all versions of feature view");
        self.registry.delete_by_name(name)
    }

    /// The view's query restricted to an event-time range
    pub fn batch_query(
        &self,
        view: &FeatureView,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> RegistryResult<Query> {
        self.registry
            .get_batch_query(&view.name, view.version, start_time, end_time)
    }

    /// Transformation functions attached to the view, by column name
    pub fn attached_transformations(
        &self,
        view: &FeatureView,
    ) -> RegistryResult<BTreeMap<String, String>> {
        let attached = self
            .registry
            .get_attached_transformations(&view.name, view.version)?;
        Ok(attached
            .into_iter()
            .map(|t| (t.name, t.transformation_function))
            .collect())
    }

    /// Register a training-dataset materialization
    ///
    /// A split dataset needs a training split; when the caller declares
    /// splits but no training split, [`DEFAULT_TRAIN_SPLIT`] is assumed.
    pub fn create_training_dataset(
        &self,
        view: &FeatureView,
        mut dataset: TrainingDatasetMeta,
    ) -> RegistryResult<TrainingDatasetMeta> {
        if !dataset.splits.is_empty() && dataset.train_split.is_none() {
            warn!(
                view = %view.name,
                split = DEFAULT_TRAIN_SPLIT,
                "no training split was set, defaulting"
            );
            dataset.train_split = Some(DEFAULT_TRAIN_SPLIT.to_string());
        }
        let created = self
            .registry
            .create_training_dataset(&view.name, view.version, &dataset)?;
        Ok(with_view_schema(created, view))
    }

    /// Metadata of one materialized training dataset
    pub fn get_training_dataset(
        &self,
        view: &FeatureView,
        dataset_version: u32,
    ) -> RegistryResult<TrainingDatasetMeta> {
        let dataset =
            self.registry
                .get_training_dataset(&view.name, view.version, dataset_version)?;
        Ok(with_view_schema(dataset, view))
    }

    /// Fetch a training dataset's metadata, registering it when absent
    ///
    /// With a version set, an existing dataset of that version wins; only a
    /// missing dataset falls through to creation. Without a version the
    /// dataset is always registered anew and the registry assigns one.
    pub fn get_or_create_training_dataset(
        &self,
        view: &FeatureView,
        dataset: TrainingDatasetMeta,
    ) -> RegistryResult<TrainingDatasetMeta> {
        if let Some(version) = dataset.version {
            match self.get_training_dataset(view, version) {
                Ok(existing) => return Ok(existing),
                Err(RegistryError::TrainingDatasetNotFound { .. }) => {
                    debug!(
                        view = %view.name,
                        dataset_version = version,
                        "training dataset not registered yet, creating"
                    );
                }
                Err(other) => return Err(other),
            }
        }
        self.create_training_dataset(view, dataset)
    }
}

/// Datasets come back from the registry without column types; the view's
/// schema is authoritative for reading them.
fn with_view_schema(mut dataset: TrainingDatasetMeta, view: &FeatureView) -> TrainingDatasetMeta {
    dataset.schema = Some(view.features.clone());
    dataset
}
