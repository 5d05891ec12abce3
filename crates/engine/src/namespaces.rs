//! Column namespace resolution
//!
//! A feature crosses three naming domains: the local name inside its feature
//! group, the physical name inside the vector index (local name behind the
//! group's column prefix), and the final name in the caller's result set
//! (local name behind the join prefix). [`ColumnNamespaces`] derives every
//! mapping between those domains from a query once, up front; afterwards the
//! maps are read-only and safe to share across threads.

use plumage_core::embedding::{EmbeddingFeature, EmbeddingIndex};
use plumage_core::error::{Error, Result};
use plumage_core::query::Query;
use plumage_core::types::{Feature, FeatureGroup, FeatureGroupId};
use std::collections::{BTreeMap, BTreeSet};

/// A selected feature paired with the vector-index metadata that serves it
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTarget {
    /// The feature as selected in the query
    pub feature: Feature,
    /// The embedding column backing the feature
    pub embedding: EmbeddingFeature,
    /// The feature group owning both
    pub group: FeatureGroup,
    /// The index the group's rows are mirrored into
    pub index: EmbeddingIndex,
}

impl EmbeddingTarget {
    /// Physical name of the embedding column inside the index
    pub fn physical_column(&self) -> String {
        self.index.physical_column(&self.embedding.name)
    }
}

/// All column-name mappings derived from one query
///
/// Built by [`ColumnNamespaces::build`] and never mutated afterwards. All
/// per-group maps are keyed by [`FeatureGroupId`] and cover only groups that
/// sit at the top level of the query (the left side or a direct join);
/// groups buried in nested joins are not searchable through this client.
#[derive(Debug, Clone)]
pub struct ColumnNamespaces {
    targets: Vec<EmbeddingTarget>,
    local_to_physical: BTreeMap<FeatureGroupId, BTreeMap<String, String>>,
    physical_to_local: BTreeMap<FeatureGroupId, BTreeMap<String, String>>,
    physical_to_final: BTreeMap<FeatureGroupId, BTreeMap<String, String>>,
    physical_primary_keys: BTreeMap<FeatureGroupId, Vec<String>>,
    index_by_group: BTreeMap<FeatureGroupId, EmbeddingIndex>,
    embedding_groups: BTreeMap<usize, FeatureGroup>,
    embedding_final_names: BTreeSet<String>,
}

impl ColumnNamespaces {
    /// Derive the column namespaces of `query`
    ///
    /// Fails when a feature group with an embedding index is joined more
    /// than once, or when a declared primary-key column is not a feature of
    /// its group.
    pub fn build(query: &Query) -> Result<Self> {
        let mut namespaces = ColumnNamespaces {
            targets: Vec::new(),
            local_to_physical: BTreeMap::new(),
            physical_to_local: BTreeMap::new(),
            physical_to_final: BTreeMap::new(),
            physical_primary_keys: BTreeMap::new(),
            index_by_group: BTreeMap::new(),
            embedding_groups: BTreeMap::new(),
            embedding_final_names: BTreeSet::new(),
        };
        namespaces.collect_targets(query);
        namespaces.build_local_maps(query)?;
        namespaces.build_final_maps(query)?;
        Ok(namespaces)
    }

    /// Pair every selected feature with its embedding metadata, over the
    /// whole join tree.
    fn collect_targets(&mut self, query: &Query) {
        for group in query.feature_groups() {
            let Some(index) = &group.embedding_index else {
                continue;
            };
            for embedding in &index.features {
                for feature in &group.features {
                    if feature.name == embedding.name
                        && feature.feature_group_id == Some(group.id)
                    {
                        self.targets.push(EmbeddingTarget {
                            feature: feature.clone(),
                            embedding: embedding.clone(),
                            group: group.clone(),
                            index: index.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Map selected columns between local and physical names, per top-level
    /// group. Primary keys are always mapped so point reads work even when
    /// the caller did not select them.
    fn build_local_maps(&mut self, query: &Query) -> Result<()> {
        let sub_queries = std::iter::once(query).chain(query.joins.iter().map(|j| &j.query));
        for sub in sub_queries {
            let group = &sub.left_feature_group;
            let Some(index) = &group.embedding_index else {
                continue;
            };
            let mut local_to_physical = BTreeMap::new();
            let mut physical_to_local = BTreeMap::new();
            for feature in &sub.left_features {
                let physical = index.physical_column(&feature.name);
                physical_to_local.insert(physical.clone(), feature.name.clone());
                local_to_physical.insert(feature.name.clone(), physical);
            }
            for pk in &group.primary_key {
                if group.feature(pk).is_none() {
                    return Err(Error::MissingPrimaryKey {
                        group: group.name.clone(),
                        column: pk.clone(),
                    });
                }
                let physical = index.physical_column(pk);
                physical_to_local.insert(physical.clone(), pk.clone());
                local_to_physical.insert(pk.clone(), physical);
            }
            let physical_pks = group
                .primary_key
                .iter()
                .map(|pk| index.physical_column(pk))
                .collect();
            self.local_to_physical.insert(group.id, local_to_physical);
            self.physical_to_local.insert(group.id, physical_to_local);
            self.physical_primary_keys.insert(group.id, physical_pks);
            self.index_by_group.insert(group.id, index.clone());
        }
        Ok(())
    }

    /// Map all columns of each top-level group to their final names. Join
    /// position 0 is the query's own left side and carries no prefix.
    fn build_final_maps(&mut self, query: &Query) -> Result<()> {
        let positions = std::iter::once((&query.left_feature_group, ""))
            .chain(
                query
                    .joins
                    .iter()
                    .map(|j| (&j.query.left_feature_group, j.prefix_str())),
            );
        for (join_index, (group, prefix)) in positions.enumerate() {
            let Some(index) = &group.embedding_index else {
                continue;
            };
            if self.physical_to_final.contains_key(&group.id) {
                return Err(Error::DuplicateEmbeddingJoin {
                    group: group.name.clone(),
                });
            }
            self.embedding_groups.insert(join_index, group.clone());
            for embedding in &index.features {
                self.embedding_final_names
                    .insert(format!("{prefix}{}", embedding.name));
            }
            let mut physical_to_final = BTreeMap::new();
            for feature in &group.features {
                physical_to_final.insert(
                    index.physical_column(&feature.name),
                    format!("{prefix}{}", feature.name),
                );
            }
            self.physical_to_final.insert(group.id, physical_to_final);
        }
        Ok(())
    }

    /// The `(feature, embedding)` pairs the query selects
    pub fn targets(&self) -> &[EmbeddingTarget] {
        &self.targets
    }

    /// Resolve which embedding column a search runs against
    ///
    /// With an explicit feature, that feature must be one of the query's
    /// embedding columns. Without one, the query must select exactly one
    /// embedding column.
    pub fn resolve_target(&self, feature: Option<&Feature>) -> Result<&EmbeddingTarget> {
        match feature {
            Some(wanted) => self
                .targets
                .iter()
                .find(|t| {
                    t.feature.name == wanted.name
                        && (wanted.feature_group_id.is_none()
                            || wanted.feature_group_id == t.feature.feature_group_id)
                })
                .ok_or_else(|| Error::NotEmbeddingFeature {
                    feature: wanted.name.clone(),
                }),
            None => match self.targets.len() {
                0 => Err(Error::NoEmbeddingFeature),
                1 => Ok(&self.targets[0]),
                count => Err(Error::AmbiguousEmbeddingFeature { count }),
            },
        }
    }

    /// Whether a group's selected columns are mapped into a vector index
    pub fn has_embedding(&self, group: FeatureGroupId) -> bool {
        self.physical_to_local.contains_key(&group)
    }

    /// Local to physical column map of a group
    pub fn local_to_physical(&self, group: FeatureGroupId) -> Option<&BTreeMap<String, String>> {
        self.local_to_physical.get(&group)
    }

    /// Physical to final column map of a group
    pub fn physical_to_final(&self, group: FeatureGroupId) -> Option<&BTreeMap<String, String>> {
        self.physical_to_final.get(&group)
    }

    /// Physical columns fetched for a group, sorted by name
    pub fn source_columns(&self, group: FeatureGroupId) -> Option<Vec<String>> {
        self.physical_to_local
            .get(&group)
            .map(|m| m.keys().cloned().collect())
    }

    /// Ordered physical primary-key columns of a group
    pub fn physical_primary_keys(&self, group: FeatureGroupId) -> Option<&[String]> {
        self.physical_primary_keys.get(&group).map(Vec::as_slice)
    }

    /// Name of the index holding a group's rows
    pub fn index_name(&self, group: FeatureGroupId) -> Option<&str> {
        self.index_by_group
            .get(&group)
            .map(|i| i.index_name.as_str())
    }

    /// Embedding-bearing groups by join position, 0 for the left side
    pub fn embedding_groups(&self) -> &BTreeMap<usize, FeatureGroup> {
        &self.embedding_groups
    }

    /// The embedding-bearing group at one join position
    pub fn embedding_group_at(&self, join_index: usize) -> Option<&FeatureGroup> {
        self.embedding_groups.get(&join_index)
    }

    /// Final names of every embedding column in the result set
    pub fn embedding_final_names(&self) -> &BTreeSet<String> {
        &self.embedding_final_names
    }
}
