//! Query translation into the index DSL
//!
//! Turns filter trees and request parameters into the JSON bodies the
//! vector index executes. Translation is pure; all validation failures are
//! raised before anything is sent.

use plumage_core::error::{Error, Result};
use plumage_core::filter::{FilterCondition, FilterExpr, FilterOp};
use plumage_core::types::FeatureGroup;
use plumage_index::dsl::{self, SearchBody};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Check that every leaf of a filter references a feature of `group`
///
/// Searches run against exactly one feature group's documents, so a filter
/// on any other group can never match.
pub fn ensure_filter_in_group(filter: &FilterExpr, group: &FeatureGroup) -> Result<()> {
    for condition in filter.conditions() {
        if condition.feature.feature_group_id != Some(group.id) {
            return Err(Error::FilterOutsideEmbeddingGroup {
                feature: condition.feature.name.clone(),
                group: group.name.clone(),
                version: group.version,
            });
        }
    }
    Ok(())
}

/// Compile a filter tree into DSL clauses
///
/// Yields at most one clause: a leaf compiles to its single clause, `And`
/// and `Or` compile both sides into one wrapping bool clause, and `Single`
/// compiles exactly as its child. Leaf field names carry `col_prefix`.
pub fn compile_filter(filter: Option<&FilterExpr>, col_prefix: &str) -> Vec<JsonValue> {
    match filter {
        None => Vec::new(),
        Some(expr) => compile_expr(expr, col_prefix),
    }
}

fn compile_expr(expr: &FilterExpr, col_prefix: &str) -> Vec<JsonValue> {
    match expr {
        FilterExpr::Condition(condition) => vec![compile_condition(condition, col_prefix)],
        FilterExpr::Single(inner) => compile_expr(inner, col_prefix),
        FilterExpr::And(left, right) => {
            let mut clauses = compile_expr(left, col_prefix);
            clauses.extend(compile_expr(right, col_prefix));
            vec![dsl::bool_must(clauses)]
        }
        FilterExpr::Or(left, right) => {
            let mut clauses = compile_expr(left, col_prefix);
            clauses.extend(compile_expr(right, col_prefix));
            vec![dsl::bool_should(clauses)]
        }
    }
}

fn compile_condition(condition: &FilterCondition, col_prefix: &str) -> JsonValue {
    let field = format!("{col_prefix}{}", condition.feature.name);
    let value = condition.value.clone();
    match condition.operator {
        FilterOp::Eq => dsl::term(&field, value),
        FilterOp::Ne => dsl::bool_must_not(dsl::term(&field, value)),
        FilterOp::In => dsl::terms(&field, value),
        FilterOp::Like => dsl::wildcard_contains(&field, &like_text(&value)),
        FilterOp::Gt => dsl::range(&field, "gt", value),
        FilterOp::Ge => dsl::range(&field, "gte", value),
        FilterOp::Lt => dsl::range(&field, "lt", value),
        FilterOp::Le => dsl::range(&field, "lte", value),
    }
}

fn like_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Build a nearest-neighbor search body
///
/// `size_k` caps how many hits come back; `knn_k` is how many candidates
/// the index gathers before post-filtering and is raised above `size_k`
/// when over-fetching. The embedding column must exist on every match,
/// otherwise shared indexes return rows of foreign groups.
pub fn vector_search_body(
    column: &str,
    embedding: &[f32],
    size_k: u64,
    knn_k: u64,
    filters: Vec<JsonValue>,
    source: Vec<String>,
    min_score: Option<f64>,
) -> JsonValue {
    let mut must = vec![dsl::knn(column, embedding, knn_k), dsl::exists(column)];
    must.extend(filters);
    let mut body = SearchBody::new()
        .size(size_k)
        .query(dsl::bool_must(must))
        .source(source);
    if let Some(score) = min_score {
        if score > 0.0 {
            body = body.min_score(score);
        }
    }
    body.build()
}

/// Build a point-read body matching every given key column
///
/// Keys must already carry physical column names. No size cap is set; the
/// keys are expected to pin down a handful of rows.
pub fn keyed_read_body(keys: &BTreeMap<String, JsonValue>, source: Vec<String>) -> JsonValue {
    let clauses = keys
        .iter()
        .map(|(column, value)| dsl::match_field(column, value.clone()))
        .collect();
    SearchBody::new()
        .query(dsl::bool_must(clauses))
        .source(source)
        .build()
}

/// Build a scan body reading `n` arbitrary rows carrying the key column
pub fn scan_read_body(pk_column: &str, n: u64, source: Vec<String>) -> JsonValue {
    SearchBody::new()
        .size(n)
        .query(dsl::bool_must(vec![dsl::exists(pk_column)]))
        .source(source)
        .build()
}

/// Build a count body matching every row carrying the key column
pub fn count_body(pk_column: &str) -> JsonValue {
    SearchBody::new()
        .query(dsl::bool_must(vec![dsl::exists(pk_column)]))
        .build()
}
