//! Error types for the generation engine
//!
//! Covers every failure class of the pipeline:
//! - Unregistered or wrong-family artifact kinds
//! - Missing artifacts and versions
//! - Rejected access and rejected edits
//! - Schema validation and backend transport failures

use caseforge_backend::{BackendError, ExportError};
use caseforge_model::{ArtifactId, ArtifactKind, CaseId};
use caseforge_schema::SchemaError;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The kind has no registry entry
    #[error("unsupported artifact kind: {0}")]
    UnsupportedKind(ArtifactKind),

    /// No artifact exists for this (case, kind) pair
    #[error("artifact {kind} not found for case {case_id}")]
    ArtifactNotFound { case_id: CaseId, kind: ArtifactKind },

    /// The requested version number does not exist
    #[error("version {number} not found for artifact {artifact_id}")]
    VersionNotFound { artifact_id: ArtifactId, number: u32 },

    /// The access predicate rejected the caller
    #[error("access denied for case {0}")]
    AccessDenied(CaseId),

    /// An edit was requested with blank instructions
    #[error("edit instructions are empty")]
    EmptyInstructions,

    /// The edit variant does not apply to this kind
    #[error("artifact kind {0} does not support this edit")]
    UnsupportedEdit(ArtifactKind),

    /// An edited diagram came back without both markers
    #[error("diagram source must contain @startuml and @enduml markers")]
    InvalidDiagram,

    /// The artifact has no validated output to hand to a collaborator
    #[error("artifact {0} is not ready")]
    NotReady(ArtifactKind),

    /// The generator reply failed the kind's schema
    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    /// The chat backend call failed
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),

    /// The export collaborator failed
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl EngineError {
    /// Whether the next `ensure` call may succeed without caller changes
    ///
    /// Transport failures, malformed replies and rejected diagram edits
    /// leave the artifact regenerable; everything else needs a different
    /// request.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Backend(_) | Self::Schema(_) | Self::InvalidDiagram
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_lowercase_and_specific() {
        let err = EngineError::UnsupportedKind(ArtifactKind::Bpmn);
        assert_eq!(err.to_string(), "unsupported artifact kind: bpmn");

        let err = EngineError::NotReady(ArtifactKind::Vision);
        assert_eq!(err.to_string(), "artifact vision is not ready");
    }

    #[test]
    fn schema_failures_are_retryable() {
        let err = EngineError::from(SchemaError::NotAnObject);
        assert!(err.is_retryable());
        assert!(EngineError::InvalidDiagram.is_retryable());
    }

    #[test]
    fn lookup_failures_are_not_retryable() {
        let err = EngineError::ArtifactNotFound {
            case_id: CaseId::new(),
            kind: ArtifactKind::Scope,
        };
        assert!(!err.is_retryable());
        assert!(!EngineError::EmptyInstructions.is_retryable());
    }
}
