//! CaseForge generation engine
//!
//! The pipeline that derives, versions and edits case artifacts.
//!
//! # Core Concepts
//!
//! - [`ArtifactEngine`]: the orchestrator behind ensure, edits, review
//!   and version restore
//! - [`Registry`] + [`ArtifactBlueprint`]: one blueprint per artifact
//!   kind bundling prompt assembly, validation and rendering
//! - [`EngineConfig`]: model selection, temperature, rendering server
//!   and the default generation batch
//! - [`CaseAccess`]: the caller's already-made access decision as an
//!   opaque predicate
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use caseforge_backend::OpenAiBackend;
//! use caseforge_engine::{AllowAll, ArtifactEngine, EngineConfig};
//!
//! # async fn example(mut case: caseforge_model::Case) -> Result<(), caseforge_engine::EngineError> {
//! let backend = Arc::new(OpenAiBackend::from_env()?);
//! let engine = ArtifactEngine::new(backend, EngineConfig::from_env());
//!
//! let report = engine.ensure(&mut case, &[], &AllowAll).await?;
//! println!(
//!     "{} artifacts, {} failed kinds",
//!     report.artifacts.len(),
//!     report.errors.len()
//! );
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod access;
mod config;
mod edit;
mod engine;
mod error;
mod kinds;
mod lock;
mod registry;
mod store;
mod versions;

// Re-exports
pub use access::{AllowAll, CaseAccess, DenyAll};
pub use config::{EngineConfig, DEFAULT_DIAGRAM_EDIT_MODEL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use engine::{ArtifactEngine, EngineStats, EnsureReport};
pub use error::EngineError;
pub use kinds::{
    BpmnBlueprint, ContextDiagramBlueprint, ScopeBlueprint, UseCaseBlueprint, VisionBlueprint,
    STATIC_USE_CASE_MODEL,
};
pub use lock::CaseLocks;
pub use registry::{prompt_fingerprint, ArtifactBlueprint, PromptPair, Registry, Rendered};
pub use store::ArtifactStore;
pub use versions::VersionStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use caseforge_model::{ArtifactKind, CaseStatus, GenerationStatus};
    use caseforge_test_utils::{sample_case, scope_reply, vision_reply, ScriptedBackend};
    use std::sync::Arc;

    #[tokio::test]
    async fn default_batch_full_flow() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_value(vision_reply());
        backend.push_value(scope_reply());
        let engine = ArtifactEngine::new(backend.clone(), EngineConfig::new());
        let mut case = sample_case();

        let report = engine.ensure(&mut case, &[], &AllowAll).await.unwrap();

        assert!(report.generated_any);
        assert!(report.errors.is_empty());
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(case.status, CaseStatus::ArtifactsGenerated);
        assert_eq!(backend.calls(), 2);

        let vision = engine.get(case.id, ArtifactKind::Vision).unwrap();
        assert_eq!(vision.generation, GenerationStatus::Ready);
        assert_eq!(vision.title, "Client request portal");
        assert!(vision.content.starts_with("# Vision"));
        assert_eq!(engine.versions(case.id, ArtifactKind::Vision).unwrap().len(), 1);
    }
}
