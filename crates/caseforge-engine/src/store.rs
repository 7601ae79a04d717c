//! In-memory artifact state
//!
//! One committed row per (case, kind) pair. Writers commit whole
//! artifact values under the case lock; readers clone the latest
//! committed row without locking.

use caseforge_model::{Artifact, ArtifactKind, CaseId, ReviewStatus};
use dashmap::DashMap;

/// Concurrent map of the latest artifact state per (case, kind).
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: DashMap<(CaseId, ArtifactKind), Artifact>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed state for one (case, kind) pair.
    #[must_use]
    pub fn get(&self, case_id: CaseId, kind: ArtifactKind) -> Option<Artifact> {
        self.artifacts.get(&(case_id, kind)).map(|row| row.clone())
    }

    /// Commits an artifact state, replacing any previous row.
    pub fn upsert(&self, artifact: Artifact) {
        self.artifacts
            .insert((artifact.case_id, artifact.kind), artifact);
    }

    /// All artifacts of one case, ordered by kind.
    #[must_use]
    pub fn list(&self, case_id: CaseId) -> Vec<Artifact> {
        let mut rows: Vec<Artifact> = self
            .artifacts
            .iter()
            .filter(|row| row.key().0 == case_id)
            .map(|row| row.value().clone())
            .collect();
        rows.sort_by_key(|artifact| artifact.kind);
        rows
    }

    /// Updates the review status in place and returns the new state.
    pub fn set_review(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
        status: ReviewStatus,
    ) -> Option<Artifact> {
        let mut row = self.artifacts.get_mut(&(case_id, kind))?;
        row.set_review(status);
        Some(row.clone())
    }

    /// Whether the case has at least one artifact and every one of them
    /// is approved.
    #[must_use]
    pub fn all_approved(&self, case_id: CaseId) -> bool {
        let mut seen = false;
        for row in &self.artifacts {
            if row.key().0 != case_id {
                continue;
            }
            seen = true;
            if row.review != ReviewStatus::Approved {
                return false;
            }
        }
        seen
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
