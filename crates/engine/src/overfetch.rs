//! Result-window discovery for shared project indexes
//!
//! A shared index holds documents of many feature groups, and a top-k
//! search can lose hits to index-side null filtering when foreign documents
//! lack the searched embedding column. The engine compensates by asking for
//! more candidates than the caller wants, bounded by the index's configured
//! result window. The window is discovered once per index with a
//! deliberately oversized probe request and cached here.

use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Probe k, chosen to exceed any configured result window
pub const PROBE_K: u64 = (1 << 31) - 1;

/// Over-fetch multiplier applied to the caller's k on retry
pub const OVERFETCH_FACTOR: u64 = 3;

/// Per-index result-window cache
///
/// Safe to share across threads. Concurrent discovery of the same index is
/// harmless; both writers converge on the same ceiling.
#[derive(Debug, Default)]
pub struct ResultLimitCache {
    limits: Mutex<BTreeMap<String, u64>>,
}

impl ResultLimitCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Result window of an index, when one was discovered
    pub fn get(&self, index_name: &str) -> Option<u64> {
        self.limits.lock().get(index_name).copied()
    }

    /// Record the result window of an index
    pub fn set(&self, index_name: &str, max_k: u64) {
        self.limits.lock().insert(index_name.to_string(), max_k);
    }
}

/// The candidate count to retry with once the window is known
///
/// Capped at three times the requested k, a heuristic: enough headroom to
/// survive typical null filtering without scanning the whole index. Falls
/// back to the request itself when no window was discovered, so a retry
/// without a ceiling repeats the original search.
pub fn retry_k(ceiling: Option<u64>, k: u64) -> u64 {
    ceiling.unwrap_or(k).min(OVERFETCH_FACTOR * k)
}
