//! Artifact kind registry
//!
//! Maps each [`ArtifactKind`] to its [`ArtifactBlueprint`]: prompt
//! assembly, model selection, schema validation and rendering. Adding a
//! kind to the pipeline means registering one new blueprint; no other
//! component changes.

use caseforge_model::{ArtifactKind, ContextSnapshot, Fingerprint};
use caseforge_schema::SchemaError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::kinds;

/// System and user prompt for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Title and content produced by a kind's renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub title: String,
    pub content: String,
}

/// Everything the engine needs to derive one artifact kind
///
/// # Contract
/// `validate` must accept exactly the replies `build_prompt` asks for,
/// and `render` must accept exactly what `validate` returns. The engine
/// never inspects structured payloads itself.
pub trait ArtifactBlueprint: Send + Sync {
    /// The kind this blueprint derives
    fn kind(&self) -> ArtifactKind;

    /// Stable prompt revision tag recorded on generated artifacts
    fn prompt_version(&self) -> &'static str;

    /// Backend model for this kind under the given configuration
    fn model<'a>(&self, config: &'a EngineConfig) -> &'a str;

    /// Assemble the generation prompt pair from the case snapshot
    fn build_prompt(&self, snapshot: &ContextSnapshot) -> PromptPair;

    /// Backend-free generation, when the kind supports it
    ///
    /// Returning `Some` skips the chat backend entirely; the value goes
    /// through `validate` like any backend reply.
    fn derive(&self, _snapshot: &ContextSnapshot) -> Option<Value> {
        None
    }

    /// Validate and normalize a raw generator reply
    ///
    /// # Errors
    /// Returns the kind's [`SchemaError`] for malformed replies.
    fn validate(&self, raw: &Value) -> Result<Value, SchemaError>;

    /// Render a validated payload into title and content
    fn render(&self, structured: &Value, case_title: &str) -> Rendered;

    /// Extra system-prompt line for narrative edits
    ///
    /// `None` means the kind rejects narrative editing (all diagram
    /// kinds do).
    fn narrative_edit_hint(&self) -> Option<&'static str> {
        None
    }
}

/// Digest of the exact prompt pair sent to the backend
///
/// Audit metadata only; never part of the staleness decision.
#[must_use]
pub fn prompt_fingerprint(system: &str, user: &str) -> Fingerprint {
    Fingerprint::compute_text(&format!("{system}\n---\n{user}"))
}

/// Registry of artifact blueprints, keyed by kind
#[derive(Clone, Default)]
pub struct Registry {
    blueprints: BTreeMap<ArtifactKind, Arc<dyn ArtifactBlueprint>>,
}

impl Registry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            blueprints: BTreeMap::new(),
        }
    }

    /// Create registry with all built-in kinds
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(kinds::VisionBlueprint));
        registry.register(Arc::new(kinds::ScopeBlueprint));
        registry.register(Arc::new(kinds::BpmnBlueprint));
        registry.register(Arc::new(kinds::ContextDiagramBlueprint));
        registry.register(Arc::new(kinds::UseCaseBlueprint));
        registry
    }

    /// Register a blueprint, replacing any previous one for the kind
    pub fn register(&mut self, blueprint: Arc<dyn ArtifactBlueprint>) {
        self.blueprints.insert(blueprint.kind(), blueprint);
    }

    /// Resolve the blueprint for a kind
    ///
    /// # Errors
    /// Returns [`EngineError::UnsupportedKind`] for unregistered kinds.
    pub fn resolve(&self, kind: ArtifactKind) -> Result<Arc<dyn ArtifactBlueprint>, EngineError> {
        self.blueprints
            .get(&kind)
            .cloned()
            .ok_or(EngineError::UnsupportedKind(kind))
    }

    /// Check if a kind is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.blueprints.contains_key(&kind)
    }

    /// Registered kinds in stable enum order
    #[must_use]
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.blueprints.keys().copied().collect()
    }

    /// Number of registered kinds
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
