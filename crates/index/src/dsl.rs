//! Builders for the vector database's JSON query language
//!
//! The index speaks an OpenSearch-style DSL: a search body carries a `query`
//! clause tree plus request-level settings such as `size` and `_source`.
//! The functions here build single clauses; [`SearchBody`] assembles a
//! complete request. Everything produces plain `serde_json::Value`, so the
//! exact wire shape stays visible in tests.

use serde_json::{json, Value as JsonValue};

/// `{"term": {field: value}}` - exact match on one field
pub fn term(field: &str, value: JsonValue) -> JsonValue {
    json!({ "term": { field: value } })
}

/// `{"terms": {field: [values...]}}` - match any of the given values
pub fn terms(field: &str, values: JsonValue) -> JsonValue {
    json!({ "terms": { field: values } })
}

/// `{"match": {field: value}}` - analyzed match on one field
pub fn match_field(field: &str, value: JsonValue) -> JsonValue {
    json!({ "match": { field: value } })
}

/// `{"wildcard": {field: {"value": "*text*"}}}` - substring match
pub fn wildcard_contains(field: &str, text: &str) -> JsonValue {
    json!({ "wildcard": { field: { "value": format!("*{text}*") } } })
}

/// `{"range": {field: {op: value}}}` where `op` is one of
/// `gt`, `gte`, `lt`, `lte`
pub fn range(field: &str, op: &str, value: JsonValue) -> JsonValue {
    json!({ "range": { field: { op: value } } })
}

/// `{"exists": {"field": field}}` - the document carries a non-null value
pub fn exists(field: &str) -> JsonValue {
    json!({ "exists": { "field": field } })
}

/// `{"knn": {field: {"vector": [...], "k": k}}}` - nearest-neighbor clause
pub fn knn(field: &str, vector: &[f32], k: u64) -> JsonValue {
    json!({ "knn": { field: { "vector": vector, "k": k } } })
}

/// `{"bool": {"must": [clauses...]}}` - all clauses must match
pub fn bool_must(clauses: Vec<JsonValue>) -> JsonValue {
    json!({ "bool": { "must": clauses } })
}

/// `{"bool": {"should": [...], "minimum_should_match": 1}}` - at least one
/// clause must match
pub fn bool_should(clauses: Vec<JsonValue>) -> JsonValue {
    json!({ "bool": { "should": clauses, "minimum_should_match": 1 } })
}

/// `{"bool": {"must_not": [clause]}}` - the clause must not match
pub fn bool_must_not(clause: JsonValue) -> JsonValue {
    json!({ "bool": { "must_not": [clause] } })
}

/// Assembles a complete search request body
///
/// ```
/// use plumage_index::dsl::{self, SearchBody};
///
/// let body = SearchBody::new()
///     .size(10)
///     .query(dsl::exists("0_id"))
///     .source(vec!["0_id".to_string()])
///     .build();
/// assert_eq!(body["size"], 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchBody {
    size: Option<u64>,
    query: Option<JsonValue>,
    source: Option<Vec<String>>,
    min_score: Option<f64>,
}

impl SearchBody {
    /// Create an empty body
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of hits to return
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the query clause tree
    pub fn query(mut self, query: JsonValue) -> Self {
        self.query = Some(query);
        self
    }

    /// Restrict `_source` to the given columns
    pub fn source(mut self, columns: Vec<String>) -> Self {
        self.source = Some(columns);
        self
    }

    /// Drop hits scoring below the given threshold
    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    /// Produce the JSON request body
    pub fn build(self) -> JsonValue {
        let mut body = serde_json::Map::new();
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if let Some(query) = self.query {
            body.insert("query".to_string(), query);
        }
        if let Some(source) = self.source {
            body.insert("_source".to_string(), json!(source));
        }
        if let Some(min_score) = self.min_score {
            body.insert("min_score".to_string(), json!(min_score));
        }
        JsonValue::Object(body)
    }
}
