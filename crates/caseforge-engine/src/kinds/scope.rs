//! Scope document blueprint

use caseforge_model::{ArtifactKind, ContextSnapshot};
use caseforge_schema::{render_scope, validate_scope, SchemaError};
use serde_json::Value;

use super::payload_json;
use crate::config::EngineConfig;
use crate::registry::{ArtifactBlueprint, PromptPair, Rendered};

const PROMPT_VERSION: &str = "scope_v1";

const SYSTEM_PROMPT: &str = r#"You are an experienced business analyst at a large bank.
Draft a Scope document (solution boundaries) for the initiative.

Requirements:
- formal business style;
- separate explicitly what is in scope and what is out of scope;
- never invent technical details; use only facts from the input data;
- when information is missing: "Requires clarification from source data".

Reply strictly as JSON without explanations or comments, exactly this structure:
{
  "summary": "",
  "in_scope": [""],
  "out_of_scope": [""],
  "business_processes_in_scope": [""],
  "systems_in_scope": [""],
  "assumptions": [""],
  "constraints": [""]
}"#;

/// Blueprint for the scope narrative document
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeBlueprint;

impl ArtifactBlueprint for ScopeBlueprint {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Scope
    }

    fn prompt_version(&self) -> &'static str {
        PROMPT_VERSION
    }

    fn model<'a>(&self, config: &'a EngineConfig) -> &'a str {
        config.model_for(ArtifactKind::Scope)
    }

    fn build_prompt(&self, snapshot: &ContextSnapshot) -> PromptPair {
        PromptPair {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Generate the Scope document JSON (solution boundaries) from the data below.\n\
                 Case data and answers:\n\n{}",
                payload_json(snapshot)
            ),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, SchemaError> {
        validate_scope(raw)
    }

    fn render(&self, structured: &Value, case_title: &str) -> Rendered {
        Rendered {
            title: format!("Scope: {case_title}"),
            content: render_scope(structured),
        }
    }

    fn narrative_edit_hint(&self) -> Option<&'static str> {
        Some(
            "Document type: Scope (solution boundaries, in_scope / out_of_scope, \
             risks, dependencies, assumptions).",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_model::Case;
    use serde_json::json;

    #[test]
    fn prompt_names_every_required_key() {
        let snapshot = ContextSnapshot::build(&Case::new("Portal"));
        let prompts = ScopeBlueprint.build_prompt(&snapshot);
        for key in caseforge_schema::SCOPE_KEYS {
            assert!(prompts.system.contains(key), "system prompt misses {key}");
        }
    }

    #[test]
    fn render_uses_fixed_title_convention() {
        let rendered = ScopeBlueprint.render(&json!({"summary": "s"}), "Portal");
        assert_eq!(rendered.title, "Scope: Portal");
        assert!(rendered.content.starts_with("# Scope"));
    }

    #[test]
    fn validate_delegates_to_scope_schema() {
        let err = ScopeBlueprint.validate(&json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingFields(_)));
    }
}
