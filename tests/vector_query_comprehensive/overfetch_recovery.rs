//! Over-Fetch Recovery
//!
//! Validates result-window discovery and candidate-count raising when a
//! shared project index post-filters a top-k result short.

use super::test_utils::*;
use plumage_core::Error;
use plumage_engine::{EngineError, NeighborSearch};
use plumage_index::testing::{hit, ScriptedIndex};
use plumage_index::{IndexError, SearchHit};
use serde_json::json;
use std::sync::Arc;

fn product_hits(count: usize) -> Vec<SearchHit> {
    (0..count).map(|n| hit(0.5, json!({"1_id": n}))).collect()
}

// ============================================================================
// Window Discovery
// ============================================================================

/// A short shared-index result probes for the window and retries
#[test]
fn test_short_result_probes_and_retries() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: Some(50) });
    backend.enqueue_hits(product_hits(10));
    let client = client_over(&products().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();
    assert_eq!(neighbors.len(), 10);

    let calls = backend.search_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(knn_k(&calls[0].body, "1_emb"), 10);
    // The probe asks for more candidates than any index window allows,
    // while the result size stays at the caller's k.
    assert_eq!(knn_k(&calls[1].body, "1_emb"), 2_147_483_647);
    assert_eq!(calls[1].body["size"], json!(10));
    // The retry raises candidates to three times k, capped by the window.
    assert_eq!(knn_k(&calls[2].body, "1_emb"), 30);
    assert_eq!(calls[2].body["size"], json!(10));
}

/// A window below three times k caps the retry
#[test]
fn test_low_window_caps_retry_candidates() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: Some(16) });
    backend.enqueue_hits(product_hits(9));
    let client = client_over(&products().select_all(), &backend);

    client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();

    assert_eq!(knn_k(&backend.search_calls()[2].body, "1_emb"), 16);
}

/// The discovered window is reused; later searches skip the probe
#[test]
fn test_window_cached_across_searches() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: Some(50) });
    backend.enqueue_hits(product_hits(10));
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_hits(product_hits(10));
    let client = client_over(&products().select_all(), &backend);

    let search = NeighborSearch::new(vec![1.0]);
    client.find_neighbors(&search, &view_schema()).unwrap();
    client.find_neighbors(&search, &view_schema()).unwrap();

    let calls = backend.search_calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(knn_k(&calls[3].body, "1_emb"), 10);
    assert_eq!(knn_k(&calls[4].body, "1_emb"), 30);
    assert_eq!(backend.remaining_searches(), 0);
}

/// An index that accepts the probe reveals no window; the retry repeats k
#[test]
fn test_accepting_probe_leaves_window_unknown() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_hits(product_hits(4));
    let client = client_over(&products().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();

    assert_eq!(neighbors.len(), 4);
    assert_eq!(knn_k(&backend.search_calls()[2].body, "1_emb"), 10);
}

// ============================================================================
// Failure Propagation
// ============================================================================

/// A rejection that names no window cannot be recovered from
#[test]
fn test_probe_rejection_without_window_fails() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: None });
    let client = client_over(&products().select_all(), &backend);

    let err = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Index(IndexError::RequestedKTooLarge { max_k: None })
    );
}

/// Transport failures during the probe propagate unchanged
#[test]
fn test_probe_transport_failure_propagates() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::Transport("connection reset".to_string()));
    let client = client_over(&products().select_all(), &backend);

    let err = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Index(IndexError::Transport("connection reset".to_string()))
    );
}

// ============================================================================
// Retry Semantics
// ============================================================================

/// The retry result stands even when shorter than the first attempt
#[test]
fn test_retry_result_replaces_first_attempt() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(4));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: Some(500) });
    backend.enqueue_hits(product_hits(2));
    let client = client_over(&products().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();
    assert_eq!(neighbors.len(), 2);
}

/// A full result from a shared index needs no compensation
#[test]
fn test_full_shared_result_skips_probe() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(10));
    let client = client_over(&products().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();

    assert_eq!(neighbors.len(), 10);
    assert_eq!(backend.search_calls().len(), 1);
}

/// A dedicated index is never over-fetched; short results are real
#[test]
fn test_dedicated_index_short_result_stands() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(0.5, json!({"review_id": 1}))]);
    let client = client_over(&reviews().select_all(), &backend);

    let neighbors = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap();

    assert_eq!(neighbors.len(), 1);
    assert_eq!(backend.search_calls().len(), 1);
}

/// Search parameters survive over-fetch unchanged apart from the knn k
#[test]
fn test_retry_preserves_filters_and_projection() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(product_hits(1));
    backend.enqueue_error(IndexError::RequestedKTooLarge { max_k: Some(500) });
    backend.enqueue_hits(product_hits(3));
    let group = products();
    let client = client_over(&group.select_all(), &backend);

    let filter = group.feature("price").unwrap().lt(50);
    client
        .find_neighbors(
            &NeighborSearch::new(vec![1.0]).with_k(3).with_filter(filter),
            &view_schema(),
        )
        .unwrap();

    let calls = backend.search_calls();
    let first = &calls[0].body;
    let retry = &calls[2].body;
    assert_eq!(
        retry["query"]["bool"]["must"][2],
        json!({"range": {"1_price": {"lt": 50}}})
    );
    assert_eq!(retry["_source"], first["_source"]);
    assert_eq!(retry["size"], first["size"]);
    assert_eq!(knn_k(retry, "1_emb"), 9);
}

/// Unknown result columns surface as errors, not silent drops
#[test]
fn test_foreign_result_column_is_reported() {
    let backend = Arc::new(ScriptedIndex::new());
    backend.enqueue_hits(vec![hit(0.5, json!({"9_ghost": 1}))]);
    let client = client_over(&reviews().select_all(), &backend);

    let err = client
        .find_neighbors(&NeighborSearch::new(vec![1.0]), &view_schema())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Query(Error::ColumnNotFound {
            column: "9_ghost".to_string(),
        })
    );
}
