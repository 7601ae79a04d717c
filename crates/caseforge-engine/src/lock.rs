//! Per-case generation locks
//!
//! Every mutating pipeline (ensure, edits, restores) serializes on the
//! case it touches. Reads never take a lock: callers see the last
//! committed artifact state, including `Generating` placeholders.

use std::sync::Arc;

use caseforge_model::CaseId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily created async mutexes keyed by case id.
///
/// A lock entry is created on first use and kept for the lifetime of
/// the engine; the per-entry cost is a single `Arc<Mutex<()>>`.
#[derive(Debug, Default)]
pub struct CaseLocks {
    locks: DashMap<CaseId, Arc<Mutex<()>>>,
}

impl CaseLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `case_id`, waiting until the current
    /// holder (if any) releases it.
    pub async fn acquire(&self, case_id: CaseId) -> OwnedMutexGuard<()> {
        // The map guard must drop before awaiting, or two tasks on the
        // same shard would deadlock the map itself.
        let lock = self
            .locks
            .entry(case_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
