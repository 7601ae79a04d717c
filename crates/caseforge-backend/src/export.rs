//! Document export seam
//!
//! Binary exports (DOCX and friends) are produced by an external
//! collaborator. This module only defines the contract: an exporter
//! receives an already-validated artifact and hands back an opaque blob.

use caseforge_model::Artifact;

use crate::error::ExportError;

/// Binary exporter contract
///
/// Callers guarantee the artifact is ready with structured data before
/// invoking this; exporters never re-validate.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Produce the binary form of the artifact
    ///
    /// # Errors
    /// Returns [`ExportError`] when the exporter does not handle the kind
    /// or rendering fails.
    async fn export(&self, artifact: &Artifact) -> Result<Vec<u8>, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_model::{ArtifactKind, CaseId};

    #[tokio::test]
    async fn mock_exporter_returns_blob() {
        let mut mock = MockDocumentExporter::new();
        mock.expect_export()
            .returning(|_| Ok(b"PK\x03\x04".to_vec()));

        let artifact = Artifact::new(CaseId::new(), ArtifactKind::Vision);
        let blob = mock.export(&artifact).await.unwrap();
        assert!(blob.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn mock_exporter_can_refuse_kind() {
        let mut mock = MockDocumentExporter::new();
        mock.expect_export()
            .returning(|artifact| Err(ExportError::UnsupportedKind(artifact.kind)));

        let artifact = Artifact::new(CaseId::new(), ArtifactKind::ContextDiagram);
        let err = mock.export(&artifact).await.unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedKind(ArtifactKind::ContextDiagram)));
    }
}
