//! Engine configuration

use caseforge_model::ArtifactKind;
use caseforge_uml::DEFAULT_SERVER;
use std::collections::BTreeMap;

/// Model used when no per-kind override is configured
pub const DEFAULT_MODEL: &str = "gpt-5.1-mini";

/// Model used for diagram edit calls
pub const DEFAULT_DIAGRAM_EDIT_MODEL: &str = "gpt-5.1";

/// Sampling temperature applied to every backend call
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Engine configuration
///
/// Per-kind model overrides sit in a map so registering a new artifact
/// kind needs no config change; unset kinds fall back to
/// `default_model`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-kind generation model overrides
    pub models: BTreeMap<ArtifactKind, String>,
    /// Generation model for kinds without an override
    pub default_model: String,
    /// Model for narrative edit calls
    pub edit_model: String,
    /// Model for diagram edit calls
    pub diagram_edit_model: String,
    /// Sampling temperature for every backend call
    pub temperature: f32,
    /// Base URL of the PlantUML rendering server
    pub plantuml_server: String,
    /// Batch used when a case selected no kinds
    pub default_kinds: Vec<ArtifactKind>,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment
    ///
    /// Recognized variables: `CASEFORGE_MODEL_VISION`,
    /// `CASEFORGE_MODEL_SCOPE`, `CASEFORGE_MODEL_BPMN`,
    /// `CASEFORGE_MODEL_CONTEXT_DIAGRAM`, `CASEFORGE_DEFAULT_MODEL`,
    /// `CASEFORGE_EDIT_MODEL`, `CASEFORGE_DIAGRAM_EDIT_MODEL`,
    /// `CASEFORGE_TEMPERATURE` and `CASEFORGE_PLANTUML_SERVER`.
    /// Unset or blank variables leave the default in place.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let kind_vars = [
            (ArtifactKind::Vision, "CASEFORGE_MODEL_VISION"),
            (ArtifactKind::Scope, "CASEFORGE_MODEL_SCOPE"),
            (ArtifactKind::Bpmn, "CASEFORGE_MODEL_BPMN"),
            (
                ArtifactKind::ContextDiagram,
                "CASEFORGE_MODEL_CONTEXT_DIAGRAM",
            ),
        ];
        for (kind, key) in kind_vars {
            if let Some(model) = non_blank_env(key) {
                config.models.insert(kind, model);
            }
        }
        if let Some(model) = non_blank_env("CASEFORGE_DEFAULT_MODEL") {
            config.default_model = model;
        }
        if let Some(model) = non_blank_env("CASEFORGE_EDIT_MODEL") {
            config.edit_model = model;
        }
        if let Some(model) = non_blank_env("CASEFORGE_DIAGRAM_EDIT_MODEL") {
            config.diagram_edit_model = model;
        }
        if let Some(server) = non_blank_env("CASEFORGE_PLANTUML_SERVER") {
            config.plantuml_server = server;
        }
        if let Some(raw) = non_blank_env("CASEFORGE_TEMPERATURE") {
            if let Ok(temperature) = raw.parse() {
                config.temperature = temperature;
            }
        }
        config
    }

    /// Generation model for a kind, falling back to the default
    #[inline]
    #[must_use]
    pub fn model_for(&self, kind: ArtifactKind) -> &str {
        self.models
            .get(&kind)
            .map_or(self.default_model.as_str(), String::as_str)
    }

    /// With a per-kind model override
    #[inline]
    #[must_use]
    pub fn with_model(mut self, kind: ArtifactKind, model: impl Into<String>) -> Self {
        self.models.insert(kind, model.into());
        self
    }

    /// With a narrative edit model
    #[inline]
    #[must_use]
    pub fn with_edit_model(mut self, model: impl Into<String>) -> Self {
        self.edit_model = model.into();
        self
    }

    /// With a sampling temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// With a PlantUML server base URL
    #[inline]
    #[must_use]
    pub fn with_plantuml_server(mut self, server: impl Into<String>) -> Self {
        self.plantuml_server = server.into();
        self
    }

    /// With a default batch of kinds
    #[inline]
    #[must_use]
    pub fn with_default_kinds(mut self, kinds: impl IntoIterator<Item = ArtifactKind>) -> Self {
        self.default_kinds = kinds.into_iter().collect();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models: BTreeMap::new(),
            default_model: DEFAULT_MODEL.to_string(),
            edit_model: DEFAULT_MODEL.to_string(),
            diagram_edit_model: DEFAULT_DIAGRAM_EDIT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            plantuml_server: DEFAULT_SERVER.to_string(),
            default_kinds: vec![ArtifactKind::Vision, ArtifactKind::Scope],
        }
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
