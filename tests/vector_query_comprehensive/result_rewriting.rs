//! Result Rewriting
//!
//! Validates the translation of raw index documents into feature rows:
//! physical column names back to view names, and stored wire encodings
//! back to typed values.

use super::test_utils::*;
use chrono::NaiveDate;
use plumage_core::{Error, Value};
use plumage_engine::{EngineError, NeighborSearch, ReadRequest};
use plumage_index::testing::{hit, ScriptedIndex};
use serde_json::json;
use std::sync::Arc;

fn single_neighbor(source: serde_json::Value) -> plumage_core::Row {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(1.0, source)]);
    let client = client_over(&products().select_all(), &backend);
    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]).with_k(1), &view_schema())
        .unwrap();
    neighbors.into_iter().next().unwrap().row
}

fn single_neighbor_err(source: serde_json::Value) -> EngineError {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(1.0, source)]);
    let client = client_over(&products().select_all(), &backend);
    client
        .find_neighbors(&NeighborSearch::new(vec![1.0]).with_k(1), &view_schema())
        .unwrap_err()
}

// ============================================================================
// Column Renaming
// ============================================================================

/// Prefixed physical columns come back under their view names
#[test]
fn test_prefixed_columns_renamed_to_view_names() {
    let row = single_neighbor(json!({"1_id": 3, "1_price": 2.5}));
    assert_eq!(row.get("id"), Some(&Value::Int(3)));
    assert_eq!(row.get("price"), Some(&Value::Float(2.5)));
    assert!(!row.contains_key("1_id"));
}

/// Joined groups come back under their join prefix
#[test]
fn test_joined_columns_carry_join_prefix() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(1.0, json!({"review_id": 9, "stars": 4}))]);
    let client = client_over(&joined_query(), &backend);

    let rows = client
        .read(&reviews(), &view_schema(), &ReadRequest::new().with_key("review_id", 9))
        .unwrap();

    assert_eq!(rows[0].get("r_review_id"), Some(&Value::Int(9)));
    assert_eq!(rows[0].get("r_stars"), Some(&Value::Int(4)));
}

// ============================================================================
// Type Coercion
// ============================================================================

/// Date columns are stored as epoch milliseconds and decode to dates
#[test]
fn test_date_column_decodes_epoch_millis() {
    let row = single_neighbor(json!({"1_listed_on": 1_700_000_000_000_i64}));
    let expected = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
    assert_eq!(row.get("listed_on"), Some(&Value::Date(expected)));
}

/// Timestamp columns keep the time of day
#[test]
fn test_timestamp_column_decodes_epoch_millis() {
    let row = single_neighbor(json!({"1_updated_at": 1_700_000_000_000_i64}));
    let expected = NaiveDate::from_ymd_opt(2023, 11, 14)
        .unwrap()
        .and_hms_opt(22, 13, 20)
        .unwrap();
    assert_eq!(row.get("updated_at"), Some(&Value::Timestamp(expected)));
}

/// The epoch itself is a value, not an absence
#[test]
fn test_zero_epoch_decodes_to_epoch_date() {
    let row = single_neighbor(json!({"1_listed_on": 0}));
    let expected = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    assert_eq!(row.get("listed_on"), Some(&Value::Date(expected)));
}

/// Binary columns are stored as base64 text and decode to bytes
#[test]
fn test_binary_column_decodes_base64() {
    let row = single_neighbor(json!({"1_thumb": "AQID"}));
    assert_eq!(row.get("thumb"), Some(&Value::Bytes(vec![1, 2, 3])));
}

/// Complex columns share the binary wire encoding
#[test]
fn test_complex_column_decodes_base64() {
    let row = single_neighbor(json!({"1_tags": "AQID"}));
    assert_eq!(row.get("tags"), Some(&Value::Bytes(vec![1, 2, 3])));
}

/// Embedding columns are the one complex type stored as plain arrays
#[test]
fn test_embedding_column_stays_numeric_array() {
    let row = single_neighbor(json!({"1_emb": [0.5, 1.5]}));
    assert_eq!(
        row.get("emb"),
        Some(&Value::Array(vec![Value::Float(0.5), Value::Float(1.5)]))
    );
}

/// Joined embedding columns are recognized under their prefixed name
#[test]
fn test_joined_embedding_column_stays_numeric_array() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(1.0, json!({"text_emb": [0.5, 0.25]}))]);
    let client = client_over(&joined_query(), &backend);

    let rows = client
        .read(&reviews(), &view_schema(), &ReadRequest::new().with_key("review_id", 1))
        .unwrap();

    assert_eq!(
        rows[0].get("r_text_emb"),
        Some(&Value::Array(vec![Value::Float(0.5), Value::Float(0.25)]))
    );
}

/// Nulls pass through every coercion untouched
#[test]
fn test_null_values_pass_through() {
    let row = single_neighbor(json!({
        "1_listed_on": null,
        "1_thumb": null,
        "1_price": null,
    }));
    assert_eq!(row.get("listed_on"), Some(&Value::Null));
    assert_eq!(row.get("thumb"), Some(&Value::Null));
    assert_eq!(row.get("price"), Some(&Value::Null));
}

/// Columns without a schema entry keep their raw shape
#[test]
fn test_unschema_column_passes_through() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(1.0, json!({"1_thumb": "AQID"}))]);
    let client = client_over(&products().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]).with_k(1), &[])
        .unwrap();

    assert_eq!(
        neighbors[0].row.get("thumb"),
        Some(&Value::String("AQID".to_string()))
    );
}

/// A date column holding text is reported with the offending value
#[test]
fn test_malformed_date_value_is_reported() {
    let err = single_neighbor_err(json!({"1_listed_on": "tomorrow"}));
    match err {
        EngineError::Query(Error::InvalidValue { column, reason }) => {
            assert_eq!(column, "listed_on");
            assert!(reason.contains("epoch milliseconds"));
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

/// A binary column holding junk text is reported as bad base64
#[test]
fn test_malformed_base64_is_reported() {
    let err = single_neighbor_err(json!({"1_thumb": "not base64!"}));
    match err {
        EngineError::Query(Error::InvalidValue { column, reason }) => {
            assert_eq!(column, "thumb");
            assert!(reason.contains("base64"));
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}
