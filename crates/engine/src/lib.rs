//! Query engine for the Plumage feature store client
//!
//! This crate reconciles feature-store queries with the vector index:
//! - namespaces: per-group maps between local, physical and final columns
//! - translate: filter trees and requests compiled into the index DSL
//! - client: nearest-neighbor search, reads and counts over a backend
//! - overfetch: result-window discovery for shared project indexes
//! - rewrite: result renaming and schema-driven type coercion
//! - serving: serving keys grouped and resolved by join position
//! - view: feature-view and training-dataset lifecycle over a registry

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod client;
pub mod error;
pub mod namespaces;
pub mod overfetch;
pub mod registry;
pub mod rewrite;
pub mod serving;
pub mod translate;
pub mod view;

// Re-export commonly used types at the crate root
pub use client::{Neighbor, NeighborSearch, ReadRequest, VectorDbClient};
pub use error::{EngineError, Result};
pub use namespaces::{ColumnNamespaces, EmbeddingTarget};
pub use overfetch::ResultLimitCache;
pub use registry::{AttachedTransformation, FeatureViewRegistry, RegistryError, RegistryResult};
pub use serving::{EntrySelection, ServingKeyMap};
pub use view::{FeatureViewEngine, DEFAULT_TRAIN_SPLIT};
