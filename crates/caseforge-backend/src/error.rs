//! Backend error types

use caseforge_model::ArtifactKind;

/// Errors from the generation backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Network-level failure talking to the backend
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status
    #[error("backend returned status {status}: {body}")]
    Http { status: u16, body: String },

    /// Completion carried no usable message content
    #[error("backend response has no message content")]
    MissingContent,

    /// Message content was not valid JSON
    #[error("backend did not return valid JSON: {0}")]
    NonJson(#[source] serde_json::Error),

    /// Message content was JSON but not an object
    #[error("backend returned non-object JSON")]
    NotAnObject,

    /// Client-side configuration problem
    #[error("backend configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether retrying the same request later could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http { .. } | Self::MissingContent
        )
    }
}

/// Errors from a document exporter
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The exporter does not handle this artifact kind
    #[error("no exporter for artifact kind: {0}")]
    UnsupportedKind(ArtifactKind),

    /// Producing the binary failed
    #[error("export failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_are_retryable() {
        let err = BackendError::Http {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn shape_errors_are_not_retryable() {
        assert!(!BackendError::NotAnObject.is_retryable());
        assert!(!BackendError::Config("no key".to_string()).is_retryable());
    }

    #[test]
    fn export_error_names_the_kind() {
        let err = ExportError::UnsupportedKind(ArtifactKind::Bpmn);
        assert_eq!(err.to_string(), "no exporter for artifact kind: bpmn");
    }
}
