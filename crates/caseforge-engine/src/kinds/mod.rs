//! Built-in artifact kind blueprints
//!
//! One module per kind, each pairing a prompt with the matching
//! validator and renderer from `caseforge-schema`. The use-case kind is
//! the one backend-free member: it derives a skeleton diagram locally.

mod bpmn;
mod context_diagram;
mod scope;
mod use_case;
mod vision;

pub use bpmn::BpmnBlueprint;
pub use context_diagram::ContextDiagramBlueprint;
pub use scope::ScopeBlueprint;
pub use use_case::{UseCaseBlueprint, STATIC_USE_CASE_MODEL};
pub use vision::VisionBlueprint;

use caseforge_model::ContextSnapshot;

/// Case payload as pretty-printed JSON for prompt bodies
pub(crate) fn payload_json(snapshot: &ContextSnapshot) -> String {
    serde_json::to_string_pretty(snapshot.payload())
        .unwrap_or_else(|_| snapshot.canonical_payload())
}
