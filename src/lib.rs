//! Plumage - client-side query engine for a managed feature store
//!
//! Plumage reconciles declarative feature queries with the vector database
//! backing a feature store's embedding indexes: it maps columns across
//! naming domains, compiles filters into the index's JSON DSL, compensates
//! for index-side null filtering, and rewrites raw hits into typed rows.
//!
//! # Quick Start
//!
//! ```ignore
//! use plumage::{NeighborSearch, VectorDbClient};
//!
//! // Build a client from a feature view's query and serving keys
//! let client = VectorDbClient::new(&view.query, keys, backend)?;
//!
//! // Find the ten nearest neighbors of an embedding
//! let neighbors = client.find_neighbors(
//!     &NeighborSearch::new(embedding),
//!     &view.features,
//! )?;
//! ```
//!
//! # Architecture
//!
//! The workspace splits into three crates: `plumage-core` holds the
//! metadata model (feature groups, queries, filters, views), `plumage-index`
//! the vector-index DSL and transport seam, and `plumage-engine` the query
//! engine itself. This crate re-exports the public surface of all three.

pub use plumage_core::*;
pub use plumage_engine::{
    AttachedTransformation, ColumnNamespaces, EmbeddingTarget, EngineError, EntrySelection,
    FeatureViewEngine, FeatureViewRegistry, Neighbor, NeighborSearch, ReadRequest, RegistryError,
    RegistryResult, ResultLimitCache, ServingKeyMap, VectorDbClient, DEFAULT_TRAIN_SPLIT,
};
pub use plumage_index::{IndexError, SearchHit, SearchResponse, VectorIndexBackend};
