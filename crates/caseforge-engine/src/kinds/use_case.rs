//! UML use case diagram blueprint
//!
//! Unlike the other kinds this one never calls the chat backend: the
//! diagram is assembled locally from the case title and intake answers.
//! The recorded model id marks the artifact as a static fallback so the
//! audit trail stays honest about its origin.

use caseforge_model::{ArtifactKind, ContextSnapshot};
use caseforge_schema::{render_use_case, validate_diagram, SchemaError};
use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::registry::{ArtifactBlueprint, PromptPair, Rendered};

/// Model id recorded on artifacts produced without a backend call.
pub const STATIC_USE_CASE_MODEL: &str = "static_fallback_uml_use_case";

const PROMPT_VERSION: &str = "uml_use_case_v1";

/// Intake answers longer than this are truncated in diagram notes.
const EXCERPT_CHARS: usize = 120;

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

fn skeleton(case_title: &str) -> String {
    [
        "@startuml".to_string(),
        format!("title Use Case: {case_title}"),
        String::new(),
        "actor \"User\" as User".to_string(),
        "actor \"Business analyst\" as BA".to_string(),
        String::new(),
        format!("rectangle \"{case_title}\" as System {{"),
        "  usecase \"Main scenario\" as UC_Main".to_string(),
        "  usecase \"View reports\" as UC_Reports".to_string(),
        "}".to_string(),
        String::new(),
        "User --> UC_Main".to_string(),
        "BA --> UC_Reports".to_string(),
        String::new(),
        "@enduml".to_string(),
    ]
    .join("\n")
}

/// Blueprint for the UML use case diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct UseCaseBlueprint;

impl ArtifactBlueprint for UseCaseBlueprint {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::UseCaseDiagram
    }

    fn prompt_version(&self) -> &'static str {
        PROMPT_VERSION
    }

    fn model<'a>(&self, _config: &'a EngineConfig) -> &'a str {
        STATIC_USE_CASE_MODEL
    }

    fn build_prompt(&self, _snapshot: &ContextSnapshot) -> PromptPair {
        // Constant pair: the fingerprint stays stable because no prompt
        // is ever sent for this kind.
        PromptPair {
            system: "UML USE CASE FALLBACK".to_string(),
            user: "uml_use_case".to_string(),
        }
    }

    fn derive(&self, snapshot: &ContextSnapshot) -> Option<Value> {
        let mut notes = vec!["Draft use case diagram from the intake answers.".to_string()];
        if let Some(idea) = snapshot.intake_answer("idea") {
            notes.push(format!("Idea: {}", excerpt(idea)));
        }
        if let Some(actions) = snapshot.intake_answer("user_actions") {
            notes.push(format!("User actions: {}", excerpt(actions)));
        }
        Some(json!({
            "plantuml": skeleton(snapshot.case_title()),
            "notes": notes,
        }))
    }

    fn validate(&self, raw: &Value) -> Result<Value, SchemaError> {
        validate_diagram(raw)
    }

    fn render(&self, structured: &Value, case_title: &str) -> Rendered {
        Rendered {
            title: format!("Use Case: {case_title}"),
            content: render_use_case(structured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_model::Case;

    #[test]
    fn derive_builds_a_marked_skeleton() {
        let snapshot = ContextSnapshot::build(&Case::new("Client portal"));
        let structured = UseCaseBlueprint.derive(&snapshot).unwrap();
        let source = structured["plantuml"].as_str().unwrap();
        assert!(source.starts_with("@startuml"));
        assert!(source.ends_with("@enduml"));
        assert!(source.contains("title Use Case: Client portal"));
        assert!(source.contains("rectangle \"Client portal\" as System"));
    }

    #[test]
    fn derive_notes_include_intake_answers_when_present() {
        let case = Case::new("Portal").with_intake_answers(serde_json::json!({
            "idea": "Self-service loan applications",
            "user_actions": "Fill the form, upload documents",
        }));
        let snapshot = ContextSnapshot::build(&case);
        let structured = UseCaseBlueprint.derive(&snapshot).unwrap();
        let notes = structured["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1], "Idea: Self-service loan applications");
        assert_eq!(notes[2], "User actions: Fill the form, upload documents");
    }

    #[test]
    fn derive_notes_skip_missing_answers() {
        let snapshot = ContextSnapshot::build(&Case::new("Portal"));
        let structured = UseCaseBlueprint.derive(&snapshot).unwrap();
        let notes = structured["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn long_answers_are_truncated_in_notes() {
        let long = "x".repeat(400);
        let case = Case::new("Portal").with_intake_answers(serde_json::json!({ "idea": long }));
        let snapshot = ContextSnapshot::build(&case);
        let structured = UseCaseBlueprint.derive(&snapshot).unwrap();
        let note = structured["notes"][1].as_str().unwrap();
        assert_eq!(note.chars().count(), "Idea: ".len() + EXCERPT_CHARS);
    }

    #[test]
    fn skeleton_survives_validation_unchanged() {
        let snapshot = ContextSnapshot::build(&Case::new("Portal"));
        let derived = UseCaseBlueprint.derive(&snapshot).unwrap();
        let validated = UseCaseBlueprint.validate(&derived).unwrap();
        assert_eq!(validated["plantuml"], derived["plantuml"]);
    }

    #[test]
    fn model_ignores_configuration() {
        let config = EngineConfig::new().with_model(ArtifactKind::UseCaseDiagram, "gpt-5.1");
        assert_eq!(UseCaseBlueprint.model(&config), STATIC_USE_CASE_MODEL);
    }
}
