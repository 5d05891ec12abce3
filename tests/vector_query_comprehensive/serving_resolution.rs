//! Serving-Key Resolution
//!
//! Validates the grouping of serving keys by join position and the
//! selection of key values out of caller-provided entries.

use super::test_utils::*;
use plumage_core::{Error, ServingKey};
use plumage_engine::{EngineError, ServingKeyMap};
use plumage_index::testing::ScriptedIndex;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

fn entry(pairs: Vec<(&str, JsonValue)>) -> BTreeMap<String, JsonValue> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

// ============================================================================
// Key Grouping
// ============================================================================

/// Serving keys are grouped by the join position they belong to
#[test]
fn test_serving_keys_grouped_by_join_position() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let map = client.serving_keys();
    assert_eq!(map.join_indexes().collect::<Vec<_>>(), vec![0, 1]);

    let root = map.at(0).unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].feature_name, "id");

    let joined = map.at(1).unwrap();
    assert_eq!(joined[0].feature_name, "review_id");
    assert_eq!(joined[0].required_key(), "r_review_id");
}

/// Repeated access yields the same grouping, content and all
#[test]
fn test_grouping_is_stable_across_accesses() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let first: Vec<ServingKey> = client.serving_keys().at(1).unwrap().to_vec();
    let second: Vec<ServingKey> = client.serving_keys().at(1).unwrap().to_vec();
    assert_eq!(first, second);
}

/// Embedding-bearing groups are indexed by the same join positions
#[test]
fn test_embedding_groups_indexed_by_join_position() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let groups = client.embedding_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.get(&0).map(|g| g.name.as_str()), Some("products"));
    assert_eq!(groups.get(&1).map(|g| g.name.as_str()), Some("reviews"));
}

// ============================================================================
// Entry Selection
// ============================================================================

/// A prefixed alias wins over the plain feature name
#[test]
fn test_alias_preferred_over_plain_name() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let selection = client
        .filter_entry_by_join_index(
            &entry(vec![("r_review_id", json!(7)), ("review_id", json!(99))]),
            1,
        )
        .unwrap();

    assert!(selection.complete);
    assert_eq!(selection.keys.get("review_id"), Some(&json!(7)));
}

/// The plain feature name serves as a fallback when the alias is absent
#[test]
fn test_plain_name_fallback() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let selection = client
        .filter_entry_by_join_index(&entry(vec![("review_id", json!(7))]), 1)
        .unwrap();

    assert!(selection.complete);
    assert_eq!(selection.keys.get("review_id"), Some(&json!(7)));
}

/// Zero and empty-string values are present values, not absences
#[test]
fn test_falsy_values_count_as_present() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let selection = client
        .filter_entry_by_join_index(&entry(vec![("id", json!(0))]), 0)
        .unwrap();
    assert!(selection.complete);
    assert_eq!(selection.keys.get("id"), Some(&json!(0)));

    let selection = client
        .filter_entry_by_join_index(&entry(vec![("id", json!(""))]), 0)
        .unwrap();
    assert!(selection.complete);
    assert_eq!(selection.keys.get("id"), Some(&json!("")));
}

/// An explicit null is treated as a missing key
#[test]
fn test_null_value_counts_as_missing() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let selection = client
        .filter_entry_by_join_index(&entry(vec![("id", json!(null))]), 0)
        .unwrap();

    assert!(!selection.complete);
    assert_eq!(selection.keys.get("id"), Some(&json!(null)));
}

/// Resolution stops at the first missing key of a multi-key group
#[test]
fn test_missing_key_stops_resolution_early() {
    let map = ServingKeyMap::new(&[
        ServingKey::new("region", 0),
        ServingKey::new("id", 0),
    ]);

    let selection = map
        .filter_entry_by_join_index(&entry(vec![("id", json!(1))]), 0)
        .unwrap();

    assert!(!selection.complete);
    assert_eq!(selection.keys.get("region"), Some(&json!(null)));
    assert!(!selection.keys.contains_key("id"));
}

/// A join position without serving keys is reported by index
#[test]
fn test_unknown_join_index_rejected() {
    let backend = Arc::new(ScriptedIndex::new());
    let client = client_over(&joined_query(), &backend);

    let err = client
        .filter_entry_by_join_index(&entry(vec![("id", json!(1))]), 5)
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Query(Error::UnknownJoinIndex { index: 5 })
    );
}

/// The serving map keeps construction order within one join position
#[test]
fn test_map_keeps_construction_order() {
    let map = ServingKeyMap::new(&[
        ServingKey::new("id", 0),
        ServingKey::new("region", 0).with_prefix("p_"),
        ServingKey::new("review_id", 1),
    ]);

    assert!(!map.is_empty());
    assert_eq!(map.at(0).map(|keys| keys.len()), Some(2));
    assert_eq!(map.at(0).unwrap()[0].feature_name, "id");
    assert_eq!(map.at(0).unwrap()[1].required_key(), "region");
}
