//! Immutable artifact version snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

use crate::artifact::Artifact;
use crate::ids::ArtifactId;

/// Why a version snapshot was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionReason {
    /// First successful generation (or a regeneration after staleness)
    Initial,
    /// Narrative edit accepted
    LlmEdit,
    /// Diagram edit accepted
    DiagramEdit,
    /// State copied back from an earlier version
    RestoreVersion,
}

impl VersionReason {
    /// Stable string form
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::LlmEdit => "llm_edit",
            Self::DiagramEdit => "diagram_edit",
            Self::RestoreVersion => "restore_version",
        }
    }
}

impl Display for VersionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of an artifact's editable state
///
/// Version numbers are strictly increasing per artifact, starting at 1.
/// Once written a snapshot is never mutated; the store only appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub artifact_id: ArtifactId,
    /// 1-based version number
    pub number: u32,
    pub title: String,
    pub content: String,
    pub structured: Option<Value>,
    pub reason: Option<VersionReason>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactVersion {
    /// Snapshot the artifact's current editable state as version `number`
    #[must_use]
    pub fn capture(artifact: &Artifact, number: u32, reason: Option<VersionReason>) -> Self {
        Self {
            artifact_id: artifact.id,
            number,
            title: artifact.title.clone(),
            content: artifact.content.clone(),
            structured: artifact.structured.clone(),
            reason,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactKind, GenerationOutcome};
    use crate::fingerprint::Fingerprint;
    use crate::ids::CaseId;
    use serde_json::json;

    #[test]
    fn capture_copies_editable_state() {
        let mut artifact = Artifact::new(CaseId::new(), ArtifactKind::Vision);
        artifact.begin_generation("Portal", Fingerprint::compute(b"ctx"));
        artifact.finish_generation(GenerationOutcome {
            title: "Vision: Portal".to_string(),
            content: "# Vision".to_string(),
            structured: json!({"title": "Portal"}),
            model_id: "gpt-4o".to_string(),
            prompt_version: "vision_v1".to_string(),
            prompt_fingerprint: Fingerprint::compute(b"prompts"),
        });

        let version = ArtifactVersion::capture(&artifact, 1, Some(VersionReason::Initial));

        assert_eq!(version.artifact_id, artifact.id);
        assert_eq!(version.number, 1);
        assert_eq!(version.title, artifact.title);
        assert_eq!(version.content, artifact.content);
        assert_eq!(version.structured, artifact.structured);
        assert_eq!(version.reason, Some(VersionReason::Initial));
    }

    #[test]
    fn capture_is_detached_from_later_mutation() {
        let mut artifact = Artifact::new(CaseId::new(), ArtifactKind::Scope);
        artifact.begin_generation("Portal", Fingerprint::compute(b"ctx"));
        let version = ArtifactVersion::capture(&artifact, 1, None);

        artifact.mark_failed("later failure");

        assert_eq!(version.title, "scope: Portal");
        assert!(version.structured.is_none());
    }

    #[test]
    fn reason_string_forms() {
        assert_eq!(VersionReason::Initial.as_str(), "initial");
        assert_eq!(VersionReason::LlmEdit.as_str(), "llm_edit");
        assert_eq!(VersionReason::DiagramEdit.as_str(), "diagram_edit");
        assert_eq!(VersionReason::RestoreVersion.as_str(), "restore_version");
    }
}
