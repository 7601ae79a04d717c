//! System context diagram blueprint

use caseforge_model::{ArtifactKind, ContextSnapshot};
use caseforge_schema::{render_context_diagram, validate_context_diagram, SchemaError};
use serde_json::Value;

use super::payload_json;
use crate::config::EngineConfig;
use crate::registry::{ArtifactBlueprint, PromptPair, Rendered};

const PROMPT_VERSION: &str = "context_diagram_v1";

const SYSTEM_PROMPT: &str = r#"You are an experienced solution architect at a large bank.
Build a CONTEXT diagram (System Context level) for the initiative in PlantUML.

The diagram must show:
- the TARGET SERVICE in the center;
- the actors and organizations that interact with it;
- the external systems it exchanges data with.

Requirements for the PlantUML source:

1) Use CLASSIC syntax only:
   - @startuml / @enduml
   - title ...
   - actor "Name" as ActorX
   - rectangle "System" as System
   - cloud "External system" as Ext1
   - arrows with short labels: ActorX --> System : Short request

2) STRICTLY FORBIDDEN:
   - any !include, !includeurl, !define, !pragma directives;
   - C4 macros and C4 element names;
   - comments outside elements;
   - placeholder text such as "... (skipping lines)".

3) Structure minimums:
   - at least one actor;
   - one central system for the case;
   - at least one external system;
   - arrows in both directions where the data flow goes both ways.

Reply format, STRICTLY:

{
  "plantuml": "@startuml\n...\n@enduml",
  "notes": [
    "Short comment 1",
    "Comment 2"
  ]
}

No text outside this JSON."#;

/// Blueprint for the system context diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextDiagramBlueprint;

impl ArtifactBlueprint for ContextDiagramBlueprint {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ContextDiagram
    }

    fn prompt_version(&self) -> &'static str {
        PROMPT_VERSION
    }

    fn model<'a>(&self, config: &'a EngineConfig) -> &'a str {
        config.model_for(ArtifactKind::ContextDiagram)
    }

    fn build_prompt(&self, snapshot: &ContextSnapshot) -> PromptPair {
        PromptPair {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Build the CONTEXT diagram (System Context level) for the case below in PlantUML.\n\
                 Focus on:\n\
                 - which system or service is central;\n\
                 - who interacts with it (users, external systems, organizations);\n\
                 - the main data and request flows between them.\n\n\
                 Return strictly JSON with the plantuml and notes fields.\n\n\
                 Case data:\n{}",
                payload_json(snapshot)
            ),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, SchemaError> {
        validate_context_diagram(raw)
    }

    fn render(&self, structured: &Value, case_title: &str) -> Rendered {
        Rendered {
            title: format!("Context: {case_title}"),
            content: render_context_diagram(structured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_model::Case;
    use serde_json::json;

    #[test]
    fn prompt_centers_the_target_service() {
        let snapshot = ContextSnapshot::build(&Case::new("Portal"));
        let prompts = ContextDiagramBlueprint.build_prompt(&snapshot);
        assert!(prompts.system.contains("TARGET SERVICE"));
        assert!(prompts.user.contains("System Context level"));
    }

    #[test]
    fn render_uses_fixed_title_convention() {
        let structured = json!({"plantuml": "@startuml\n@enduml", "notes": []});
        let rendered = ContextDiagramBlueprint.render(&structured, "Portal");
        assert_eq!(rendered.title, "Context: Portal");
        assert!(rendered.content.starts_with("# Context Diagram"));
    }

    #[test]
    fn validate_accepts_the_diagram_alias_key() {
        let structured = ContextDiagramBlueprint
            .validate(&json!({"diagram": "@startuml\nactor A\n@enduml"}))
            .unwrap();
        assert_eq!(structured["plantuml"], "@startuml\nactor A\n@enduml");
    }
}
