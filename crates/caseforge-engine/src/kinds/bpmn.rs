//! BPMN process diagram blueprint

use caseforge_model::{ArtifactKind, ContextSnapshot};
use caseforge_schema::{render_bpmn, validate_diagram, SchemaError};
use serde_json::Value;

use super::payload_json;
use crate::config::EngineConfig;
use crate::registry::{ArtifactBlueprint, PromptPair, Rendered};

const PROMPT_VERSION: &str = "bpmn_v1";

const SYSTEM_PROMPT: &str = r#"You are an experienced business analyst at a large bank.
Build a business process diagram (BPMN level) for the initiative in PlantUML activity syntax.

Requirements for the PlantUML source:

1) Use CLASSIC activity syntax without extra libraries:
   - @startuml / @enduml
   - title ...
   - start / stop
   - :Action step;
   - if (condition?) then (yes) ... else (no) ... endif

2) STRICTLY FORBIDDEN:
   - any !include, !includeurl, !define, !pragma directives;
   - pool and lane declarations;
   - comments outside nodes;
   - placeholder text such as "... (skipping lines)".

3) The process must follow the case data: the main user flow, the key
   decision points and their outcomes.

Reply format, STRICTLY:

{
  "plantuml": "@startuml\n...\n@enduml",
  "notes": [
    "Short comment 1",
    "Comment 2"
  ]
}

No text outside this JSON."#;

/// Blueprint for the BPMN process diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct BpmnBlueprint;

impl ArtifactBlueprint for BpmnBlueprint {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Bpmn
    }

    fn prompt_version(&self) -> &'static str {
        PROMPT_VERSION
    }

    fn model<'a>(&self, config: &'a EngineConfig) -> &'a str {
        config.model_for(ArtifactKind::Bpmn)
    }

    fn build_prompt(&self, snapshot: &ContextSnapshot) -> PromptPair {
        PromptPair {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Build the business process diagram (BPMN level) for the case below in PlantUML.\n\
                 Return strictly JSON with the plantuml and notes fields.\n\n\
                 Case data:\n{}",
                payload_json(snapshot)
            ),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, SchemaError> {
        validate_diagram(raw)
    }

    fn render(&self, structured: &Value, case_title: &str) -> Rendered {
        Rendered {
            title: format!("BPMN: {case_title}"),
            content: render_bpmn(structured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_model::Case;
    use serde_json::json;

    #[test]
    fn prompt_demands_strict_json_reply() {
        let snapshot = ContextSnapshot::build(&Case::new("Portal"));
        let prompts = BpmnBlueprint.build_prompt(&snapshot);
        assert!(prompts.system.contains("\"plantuml\""));
        assert!(prompts.system.contains("!include"));
        assert!(prompts.user.contains("Case data:"));
    }

    #[test]
    fn render_uses_fixed_title_convention() {
        let structured = json!({"plantuml": "@startuml\n@enduml", "notes": []});
        let rendered = BpmnBlueprint.render(&structured, "Portal");
        assert_eq!(rendered.title, "BPMN: Portal");
        assert!(rendered.content.starts_with("# BPMN Diagram"));
    }

    #[test]
    fn validate_applies_the_strict_diagram_pipeline() {
        let structured = BpmnBlueprint
            .validate(&json!({"plantuml": "start\nstop"}))
            .unwrap();
        assert_eq!(structured["plantuml"], "@startuml\nstart\nstop\n@enduml");
    }
}
