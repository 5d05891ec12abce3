//! Serving-key resolution for online entries
//!
//! A feature view's serving keys describe which entry columns identify a row
//! in each joined feature group. Callers pass one flat entry map; this module
//! picks out the subset a given join needs, honoring prefixed aliases and
//! falling back to the undecorated feature name.

use plumage_core::error::{Error, Result};
use plumage_core::serving_key::ServingKey;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Serving keys grouped by join position
#[derive(Debug, Clone, Default)]
pub struct ServingKeyMap {
    by_join_index: BTreeMap<usize, Vec<ServingKey>>,
}

/// The portion of an entry relevant to one join
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySelection {
    /// Whether every serving key of the join was present in the entry
    pub complete: bool,
    /// Selected values keyed by undecorated feature name, `Null` for the
    /// first missing key
    pub keys: BTreeMap<String, JsonValue>,
}

impl ServingKeyMap {
    /// Group serving keys by their join position
    pub fn new(serving_keys: &[ServingKey]) -> Self {
        let mut by_join_index: BTreeMap<usize, Vec<ServingKey>> = BTreeMap::new();
        for key in serving_keys {
            by_join_index
                .entry(key.join_index)
                .or_default()
                .push(key.clone());
        }
        Self { by_join_index }
    }

    /// Serving keys of one join position, if any
    pub fn at(&self, join_index: usize) -> Option<&[ServingKey]> {
        self.by_join_index.get(&join_index).map(Vec::as_slice)
    }

    /// Join positions that carry serving keys, in order
    pub fn join_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_join_index.keys().copied()
    }

    /// Whether no serving keys were registered at all
    pub fn is_empty(&self) -> bool {
        self.by_join_index.is_empty()
    }

    /// Select the entry values a join position needs
    ///
    /// Each serving key is looked up first under its required (possibly
    /// prefixed) name, then under the plain feature name. A null entry value
    /// counts as absent. The first missing key marks the selection
    /// incomplete and stops the scan, leaving later keys out.
    pub fn filter_entry_by_join_index(
        &self,
        entry: &BTreeMap<String, JsonValue>,
        join_index: usize,
    ) -> Result<EntrySelection> {
        let keys = self
            .by_join_index
            .get(&join_index)
            .ok_or(Error::UnknownJoinIndex { index: join_index })?;

        let mut selection = EntrySelection {
            complete: true,
            keys: BTreeMap::new(),
        };
        for key in keys {
            let value = lookup(entry, key.required_key())
                .or_else(|| lookup(entry, &key.feature_name));
            match value {
                Some(value) => {
                    selection
                        .keys
                        .insert(key.feature_name.clone(), value.clone());
                }
                None => {
                    selection
                        .keys
                        .insert(key.feature_name.clone(), JsonValue::Null);
                    selection.complete = false;
                    break;
                }
            }
        }
        Ok(selection)
    }
}

fn lookup<'a>(entry: &'a BTreeMap<String, JsonValue>, name: &str) -> Option<&'a JsonValue> {
    entry.get(name).filter(|value| !value.is_null())
}
