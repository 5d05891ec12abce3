//! Vector Query Comprehensive Test Suite
//!
//! End-to-end tests for the vector query surface, from query definition
//! through index request bodies and back to typed feature rows.
//!
//! ## Test Area Structure
//!
//! - **Search Pipeline** (request bodies, target resolution, filters, distances)
//! - **Over-Fetch Recovery** (result-window discovery, candidate raising)
//! - **Reads and Counts** (point reads, scans, row counting)
//! - **Result Rewriting** (column renaming, wire-type coercion)
//! - **Serving-Key Resolution** (join-position grouping, entry selection)
//! - **View Lifecycle** (persistence, transformations, training datasets)
//! - **Filter Properties** (property-based compilation checks)
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test vector_query_comprehensive
//!
//! # Run one area
//! cargo test --test vector_query_comprehensive search_pipeline
//! ```



// Over-Fetch Recovery
mod overfetch_recovery;


// Result Rewriting
mod result_rewriting;

// Serving-Key Resolution
mod serving_resolution;
