//! Vision document blueprint

use caseforge_model::{ArtifactKind, ContextSnapshot};
use caseforge_schema::{render_vision, validate_vision, SchemaError};
use serde_json::Value;

use super::payload_json;
use crate::config::EngineConfig;
use crate::registry::{ArtifactBlueprint, PromptPair, Rendered};

const PROMPT_VERSION: &str = "vision_v1";

const SYSTEM_PROMPT: &str = r#"You are an experienced business analyst at a large bank.
Draft a Vision / Problem Statement document for the initiative.

Requirements:
- formal business style, no filler;
- use only facts from the input data, never invent technical details;
- when information is missing, fill in neutrally: "Requires clarification from source data".

Reply strictly as JSON without explanations or comments, exactly this structure:
{
  "title": "",
  "problem_statement": "",
  "business_goals": [""],
  "target_users": [""],
  "expected_outcomes": [""],
  "success_criteria": [""],
  "risks_and_limitations": [""]
}"#;

/// Blueprint for the vision narrative document
///
/// Title convention: the generated `title` field, falling back to the
/// case title.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisionBlueprint;

impl ArtifactBlueprint for VisionBlueprint {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Vision
    }

    fn prompt_version(&self) -> &'static str {
        PROMPT_VERSION
    }

    fn model<'a>(&self, config: &'a EngineConfig) -> &'a str {
        config.model_for(ArtifactKind::Vision)
    }

    fn build_prompt(&self, snapshot: &ContextSnapshot) -> PromptPair {
        PromptPair {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Generate the Vision document JSON from the data below.\n\
                 Case data and answers:\n\n{}",
                payload_json(snapshot)
            ),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, SchemaError> {
        validate_vision(raw)
    }

    fn render(&self, structured: &Value, case_title: &str) -> Rendered {
        let title = structured
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(case_title)
            .to_string();
        Rendered {
            title,
            content: render_vision(structured),
        }
    }

    fn narrative_edit_hint(&self) -> Option<&'static str> {
        Some("Document type: Vision / Product Vision (product goals, value, users, constraints).")
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
        let prompts = VisionBlueprint.build_prompt(&snapshot);
        for key in caseforge_schema::VISION_KEYS {
            assert!(prompts.system.contains(key), "system prompt misses {key}");
        }
        assert!(prompts.user.contains("\"Portal\""));
    }

    #[test]
    fn render_prefers_generated_title() {
        let structured = json!({"title": "Customer portal", "business_goals": []});
        let rendered = VisionBlueprint.render(&structured, "Case 7");
        assert_eq!(rendered.title, "Customer portal");
        assert!(rendered.content.starts_with("# Vision"));
    }

    #[test]
    fn render_falls_back_to_case_title() {
        let rendered = VisionBlueprint.render(&json!({}), "Case 7");
        assert_eq!(rendered.title, "Case 7");
    }

    #[test]
    fn validate_delegates_to_vision_schema() {
        let err = VisionBlueprint.validate(&json!([])).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject));
    }
}
