//! Query model: feature selections and joins
//!
//! A [`Query`] selects features from one feature group and may join further
//! queries onto it. Joined columns are disambiguated in the result set by an
//! optional per-join prefix. The query itself performs no execution; it is
//! the declarative input the engine resolves column namespaces from.

use crate::types::{Feature, FeatureGroup, FeatureGroupId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A joined sub-query together with its column prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    /// The joined selection
    pub query: Query,
    /// Prefix applied to the joined columns in the result set
    pub prefix: Option<String>,
}

impl Join {
    /// Prefix as a plain string, empty when none was given
    pub fn prefix_str(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}

/// A selection of features from a feature group, with optional joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Feature group the selection starts from
    pub left_feature_group: FeatureGroup,
    /// Selected features of the left feature group
    pub left_features: Vec<Feature>,
    /// Joined sub-queries, in join order
    pub joins: Vec<Join>,
}

impl Query {
    /// Create a query selecting `features` from `feature_group`
    pub fn new(feature_group: FeatureGroup, features: Vec<Feature>) -> Self {
        Self {
            left_feature_group: feature_group,
            left_features: features,
            joins: Vec::new(),
        }
    }

    /// Join another query, prefixing its columns in the result set
    pub fn join(mut self, sub_query: Query, prefix: Option<&str>) -> Self {
        self.joins.push(Join {
            query: sub_query,
            prefix: prefix.map(String::from),
        });
        self
    }

    /// All feature groups reachable from this query, deduplicated by id
    ///
    /// Walks the join tree depth-first, left side before joins.
    pub fn feature_groups(&self) -> Vec<&FeatureGroup> {
        let mut seen: BTreeSet<FeatureGroupId> = BTreeSet::new();
        let mut out = Vec::new();
        self.collect_feature_groups(&mut seen, &mut out);
        out
    }

    fn collect_feature_groups<'a>(
        &'a self,
        seen: &mut BTreeSet<FeatureGroupId>,
        out: &mut Vec<&'a FeatureGroup>,
    ) {
        if seen.insert(self.left_feature_group.id) {
            out.push(&self.left_feature_group);
        }
        for join in &self.joins {
            join.query.collect_feature_groups(seen, out);
        }
    }
}

impl FeatureGroup {
    /// Select every feature of this group
    pub fn select_all(&self) -> Query {
        Query::new(self.clone(), self.features.clone())
    }

    /// Select features by name
    ///
    /// Names not present in the group become untyped features stamped with
    /// this group's id, matching how selections behave before the schema is
    /// fully known.
    pub fn select(&self, names: &[&str]) -> Query {
        let features = names
            .iter()
            .map(|n| {
                self.feature(n).cloned().unwrap_or_else(|| {
                    let mut f = Feature::new(*n);
                    f.feature_group_id = Some(self.id);
                    f
                })
            })
            .collect();
        Query::new(self.clone(), features)
    }
}
