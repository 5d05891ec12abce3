//! The vector database client
//!
//! [`VectorDbClient`] is the read path against the vector index. It is built
//! once per feature view from the view's query and serving keys, derives all
//! column namespaces up front, and afterwards serves concurrent searches,
//! point reads, scans and counts through a shared [`VectorIndexBackend`].
//!
//! Searches against a shared project index compensate for index-side null
//! filtering: when a top-k search comes back short, the client discovers the
//! index's result window with a deliberately oversized probe, caches it, and
//! retries with a raised candidate count.

use crate::error::Result;
use crate::namespaces::ColumnNamespaces;
use crate::overfetch::{self, ResultLimitCache};
use crate::rewrite::{coerce_row, rewrite_keys};
use crate::serving::{EntrySelection, ServingKeyMap};
use crate::translate;
use plumage_core::error::Error;
use plumage_core::filter::FilterExpr;
use plumage_core::query::Query;
use plumage_core::serving_key::ServingKey;
use plumage_core::types::{Feature, FeatureGroup};
use plumage_core::value::Row;
use plumage_core::view::TrainingDatasetFeature;
use plumage_index::{IndexError, SearchResponse, VectorIndexBackend};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default neighbor count for searches
pub const DEFAULT_K: u64 = 10;

/// Default row cap for keyless reads
pub const DEFAULT_READ_LIMIT: u64 = 10;

/// Parameters of one nearest-neighbor search
#[derive(Debug, Clone)]
pub struct NeighborSearch {
    /// Query embedding
    pub embedding: Vec<f32>,
    /// Embedding feature to search; may be omitted when the query selects
    /// exactly one
    pub feature: Option<Feature>,
    /// Overrides the index the target group is mirrored into
    pub index_name: Option<String>,
    /// Number of neighbors to return
    pub k: u64,
    /// Filter over columns of the searched feature group
    pub filter: Option<FilterExpr>,
    /// Score floor, forwarded to the index when positive
    pub min_score: Option<f64>,
}

impl NeighborSearch {
    /// Search for the [`DEFAULT_K`] nearest neighbors of `embedding`
    pub fn new(embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            feature: None,
            index_name: None,
            k: DEFAULT_K,
            filter: None,
            min_score: None,
        }
    }

    /// Name the embedding feature to search
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Search a different index than the target group's own
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Set the neighbor count
    pub fn with_k(mut self, k: u64) -> Self {
        self.k = k;
        self
    }

    /// Restrict matches with a filter tree
    pub fn with_filter(mut self, filter: impl Into<FilterExpr>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Drop matches scoring below `min_score`
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Distance to the query embedding, zero for an exact match
    pub distance: f64,
    /// Result columns keyed by final name
    pub row: Row,
}

/// Parameters of one read against a feature group's indexed rows
///
/// With keys set this is a point read matching every key column. Without
/// keys it scans up to `n` arbitrary rows and requires `pk`, the physical
/// column whose presence marks a row as belonging to the group.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Key columns by local name, with the values to match
    pub keys: BTreeMap<String, JsonValue>,
    /// Physical key column for keyless scans
    pub pk: Option<String>,
    /// Overrides the index the group is mirrored into
    pub index_name: Option<String>,
    /// Row cap for keyless scans
    pub n: u64,
}

impl ReadRequest {
    /// An empty read returning up to [`DEFAULT_READ_LIMIT`] rows
    pub fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
            pk: None,
            index_name: None,
            n: DEFAULT_READ_LIMIT,
        }
    }

    /// Match one key column against a value
    pub fn with_key(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.keys.insert(column.into(), value.into());
        self
    }

    /// Set the physical key column for a keyless scan
    pub fn with_pk(mut self, pk: impl Into<String>) -> Self {
        self.pk = Some(pk.into());
        self
    }

    /// Read from a different index than the group's own
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Set the scan row cap
    pub fn with_limit(mut self, n: u64) -> Self {
        self.n = n;
        self
    }
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Query-aware client over a vector-index backend
///
/// All mutable state lives in the result-window cache, which has interior
/// mutability; every operation takes `&self` and the client can be shared
/// across threads behind an `Arc`.
pub struct VectorDbClient {
    backend: Arc<dyn VectorIndexBackend>,
    namespaces: ColumnNamespaces,
    serving: ServingKeyMap,
    limits: ResultLimitCache,
}

impl VectorDbClient {
    /// Build a client for one query
    ///
    /// Derives the column namespaces of `query` and groups `serving_keys`
    /// by join position. Fails when the query joins an embedding-bearing
    /// group twice or declares a primary key its group does not carry.
    pub fn new(
        query: &Query,
        serving_keys: &[ServingKey],
        backend: Arc<dyn VectorIndexBackend>,
    ) -> Result<Self> {
        Ok(Self {
            backend,
            namespaces: ColumnNamespaces::build(query)?,
            serving: ServingKeyMap::new(serving_keys),
            limits: ResultLimitCache::new(),
        })
    }

    /// The column namespaces derived from the query
    pub fn namespaces(&self) -> &ColumnNamespaces {
        &self.namespaces
    }

    /// The serving keys grouped by join position
    pub fn serving_keys(&self) -> &ServingKeyMap {
        &self.serving
    }

    /// Find the nearest neighbors of an embedding
    ///
    /// Resolves which embedding column to search, validates the filter
    /// against the owning feature group, and runs a top-k search. Results
    /// come back renamed into final column names and coerced per `schema`,
    /// with the similarity score converted to a distance where zero means
    /// an exact match.
    pub fn find_neighbors(
        &self,
        search: &NeighborSearch,
        schema: &[TrainingDatasetFeature],
    ) -> Result<Vec<Neighbor>> {
        let target = self.namespaces.resolve_target(search.feature.as_ref())?;
        if let Some(filter) = &search.filter {
            translate::ensure_filter_in_group(filter, &target.group)?;
        }
        let column = target.physical_column();
        let source = self
            .namespaces
            .source_columns(target.group.id)
            .ok_or_else(|| no_embedding_index(&target.group))?;
        let filters = translate::compile_filter(search.filter.as_ref(), &target.index.col_prefix);
        let index_name = search
            .index_name
            .as_deref()
            .unwrap_or(&target.index.index_name);

        let body = translate::vector_search_body(
            &column,
            &search.embedding,
            search.k,
            search.k,
            filters.clone(),
            source.clone(),
            search.min_score,
        );
        debug!(index = index_name, k = search.k, column = %column, "searching nearest neighbors");
        let mut response = self.backend.search(index_name, &body)?;

        // A shared index post-filters documents of foreign groups out of
        // the candidate set, so a short result does not mean the data ends
        // here. Retry with a raised candidate count.
        if target.index.is_shared() && response.len() as u64 != search.k {
            response = self.overfetch(index_name, &column, search, filters, source)?;
        }

        let mapping = self
            .namespaces
            .physical_to_final(target.group.id)
            .ok_or_else(|| no_embedding_index(&target.group))?;
        let mut neighbors = Vec::with_capacity(response.len());
        for hit in response.hits() {
            let renamed = rewrite_keys(hit.source.clone(), mapping)?;
            let row = coerce_row(renamed, schema, self.namespaces.embedding_final_names())?;
            neighbors.push(Neighbor {
                distance: 1.0 / hit.score - 1.0,
                row,
            });
        }
        Ok(neighbors)
    }

    /// Re-run a short search with a raised candidate count
    ///
    /// The first time an index comes back short its result window is
    /// unknown and gets discovered with a probe whose candidate count no
    /// index accepts. The rejection names the ceiling, which is cached for
    /// every later search against the same index.
    fn overfetch(
        &self,
        index_name: &str,
        column: &str,
        search: &NeighborSearch,
        filters: Vec<JsonValue>,
        source: Vec<String>,
    ) -> Result<SearchResponse> {
        if self.limits.get(index_name).is_none() {
            // The probe is built to fail; its rejection names the ceiling.
            let probe = translate::vector_search_body(
                column,
                &search.embedding,
                search.k,
                overfetch::PROBE_K,
                filters.clone(),
                source.clone(),
                search.min_score,
            );
            match self.backend.search(index_name, &probe) {
                Ok(_) => {}
                Err(IndexError::RequestedKTooLarge { max_k: Some(max_k) }) => {
                    info!(index = index_name, max_k, "discovered index result window");
                    self.limits.set(index_name, max_k);
                }
                Err(other) => return Err(other.into()),
            }
        }

        let knn_k = overfetch::retry_k(self.limits.get(index_name), search.k);
        let body = translate::vector_search_body(
            column,
            &search.embedding,
            search.k,
            knn_k,
            filters,
            source,
            search.min_score,
        );
        let response = self.backend.search(index_name, &body)?;
        if (response.len() as u64) < search.k {
            warn!(
                index = index_name,
                requested = search.k,
                returned = response.len(),
                "shared index returned fewer rows than requested"
            );
        }
        Ok(response)
    }

    /// Read rows of one feature group from its index
    ///
    /// Key columns are given by local name and rewritten to physical names;
    /// results come back renamed into final names and coerced per `schema`.
    pub fn read(
        &self,
        group: &FeatureGroup,
        schema: &[TrainingDatasetFeature],
        request: &ReadRequest,
    ) -> Result<Vec<Row>> {
        let source = self
            .namespaces
            .source_columns(group.id)
            .ok_or_else(|| no_embedding_index(group))?;
        let body = if !request.keys.is_empty() {
            let mapping = self
                .namespaces
                .local_to_physical(group.id)
                .ok_or_else(|| no_embedding_index(group))?;
            let physical = rewrite_keys(request.keys.clone(), mapping)?;
            translate::keyed_read_body(&physical, source)
        } else {
            let pk = request.pk.as_deref().ok_or(Error::PrimaryKeyRequired)?;
            translate::scan_read_body(pk, request.n, source)
        };
        let index_name = match &request.index_name {
            Some(name) => name.as_str(),
            None => self
                .namespaces
                .index_name(group.id)
                .ok_or_else(|| no_embedding_index(group))?,
        };

        debug!(index = index_name, group = %group.name, "reading feature vectors");
        let response = self.backend.search(index_name, &body)?;

        let mapping = self
            .namespaces
            .physical_to_final(group.id)
            .ok_or_else(|| no_embedding_index(group))?;
        let mut rows = Vec::with_capacity(response.len());
        for hit in response.hits() {
            let renamed = rewrite_keys(hit.source.clone(), mapping)?;
            rows.push(coerce_row(
                renamed,
                schema,
                self.namespaces.embedding_final_names(),
            )?);
        }
        Ok(rows)
    }

    /// Count the indexed rows of one feature group
    ///
    /// Counts documents carrying the group's first physical primary-key
    /// column, which every row of the group has and no foreign row does.
    pub fn count(&self, group: &FeatureGroup) -> Result<u64> {
        let pks = self
            .namespaces
            .physical_primary_keys(group.id)
            .ok_or_else(|| no_embedding_index(group))?;
        let pk = pks.first().ok_or_else(|| Error::NoPrimaryKey {
            group: group.name.clone(),
        })?;
        let index_name = self
            .namespaces
            .index_name(group.id)
            .ok_or_else(|| no_embedding_index(group))?;
        let body = translate::count_body(pk);
        debug!(index = index_name, group = %group.name, "counting feature vectors");
        Ok(self.backend.count(index_name, &body)?)
    }

    /// Select the entry values one join position needs
    pub fn filter_entry_by_join_index(
        &self,
        entry: &BTreeMap<String, JsonValue>,
        join_index: usize,
    ) -> Result<EntrySelection> {
        Ok(self.serving.filter_entry_by_join_index(entry, join_index)?)
    }

    /// Embedding-bearing groups of the query by join position
    pub fn embedding_groups(&self) -> &BTreeMap<usize, FeatureGroup> {
        self.namespaces.embedding_groups()
    }
}

fn no_embedding_index(group: &FeatureGroup) -> Error {
    Error::NoEmbeddingIndex {
        group: group.name.clone(),
    }
}
