//! Append-only version history
//!
//! Every accepted content change snapshots the artifact before the
//! caller sees it. Snapshots are immutable; a restore copies an old
//! snapshot forward and records the copy as a new version, so history
//! never rewrites itself.

use caseforge_model::{Artifact, ArtifactId, ArtifactVersion, VersionReason};
use dashmap::DashMap;

/// Version snapshots grouped per artifact, newest appended last.
#[derive(Debug, Default)]
pub struct VersionStore {
    versions: DashMap<ArtifactId, Vec<ArtifactVersion>>,
}

impl VersionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot of the artifact's current state and returns it.
    ///
    /// Numbers are assigned here: one past the highest existing number,
    /// starting at 1.
    pub fn snapshot(&self, artifact: &Artifact, reason: Option<VersionReason>) -> ArtifactVersion {
        let mut history = self.versions.entry(artifact.id).or_default();
        let number = history.iter().map(|v| v.number).max().unwrap_or(0) + 1;
        let version = ArtifactVersion::capture(artifact, number, reason);
        history.push(version.clone());
        version
    }

    /// Full history for one artifact, newest first.
    #[must_use]
    pub fn versions(&self, artifact_id: ArtifactId) -> Vec<ArtifactVersion> {
        let mut history = self
            .versions
            .get(&artifact_id)
            .map(|h| h.clone())
            .unwrap_or_default();
        history.sort_by(|a, b| b.number.cmp(&a.number));
        history
    }

    /// One numbered snapshot, if recorded.
    #[must_use]
    pub fn get(&self, artifact_id: ArtifactId, number: u32) -> Option<ArtifactVersion> {
        self.versions
            .get(&artifact_id)?
            .iter()
            .find(|v| v.number == number)
            .cloned()
    }

    /// Number of snapshots recorded for one artifact.
    #[must_use]
    pub fn count(&self, artifact_id: ArtifactId) -> usize {
        self.versions.get(&artifact_id).map_or(0, |h| h.len())
    }
}
