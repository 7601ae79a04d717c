//! Artifact editing and version restore
//!
//! Both edit variants re-enter the backend with the artifact's current
//! state and the caller's instructions, then re-validate the reply as
//! strictly as initial generation. An edit that fails validation or the
//! marker check leaves the stored artifact untouched.

use caseforge_backend::{ChatBackend, ChatRequest};
use caseforge_model::{
    Artifact, ArtifactKind, Case, CaseId, ContextSnapshot, GenerationStatus, VersionReason,
};
use caseforge_schema::{diagram_source, SchemaError};
use caseforge_uml::{extract_fenced, fenced, fix_known_syntax, has_markers, EMPTY_DIAGRAM};
use serde_json::{json, Value};

use crate::access::CaseAccess;
use crate::engine::ArtifactEngine;
use crate::error::EngineError;

const NARRATIVE_EDIT_SYSTEM_PROMPT: &str = r#"You are an experienced business analyst and requirements editor.
You are given an existing STRUCTURED document (JSON) that must be
carefully changed following the user's instructions.

Goals:
- apply the requested edits;
- KEEP the original JSON structure (same root fields and nested sections).

Never:
- invent new root fields;
- drop important sections without an explicit reason;
- return text outside the JSON.

Reply format, STRICTLY:

{
  "structured": { ... the changed JSON in the same shape ... }
}"#;

const DIAGRAM_EDIT_SYSTEM_PROMPT: &str = r#"You are a business analyst's assistant and a PlantUML expert.

Your task is to carefully edit existing diagrams (BPMN, context, UML use case):
- understand the case context and its goal;
- take the current PlantUML source into account;
- apply edits strictly following the user's instructions;
- preserve the structure and meaning of the diagram;
- return new, valid PlantUML source.

Reply strictly as a JSON object with a "plantuml" string field holding the
full source from @startuml to @enduml. No comments or explanations outside
the JSON."#;

/// Current diagram source of an artifact, for the edit prompt.
///
/// Chain: structured `plantuml`, else the content's fenced block, else
/// the whole content, else the bare marker skeleton.
fn current_diagram_source(artifact: &Artifact) -> String {
    if let Some(structured) = &artifact.structured {
        let source = diagram_source(structured).trim();
        if !source.is_empty() {
            return source.to_string();
        }
    }
    if let Some(fence) = extract_fenced(&artifact.content) {
        return fence.to_string();
    }
    let content = artifact.content.trim();
    if !content.is_empty() {
        return content.to_string();
    }
    EMPTY_DIAGRAM.to_string()
}

impl<B: ChatBackend> ArtifactEngine<B> {
    /// Apply free-text edit instructions to a narrative artifact
    ///
    /// The backend receives the current structured payload plus the
    /// instructions and must answer `{"structured": {...}}`; the result
    /// passes the kind's validator before anything is stored. Success
    /// records an `llm_edit` version.
    ///
    /// # Errors
    /// `AccessDenied`, `EmptyInstructions`, `UnsupportedEdit` for
    /// diagram kinds, `ArtifactNotFound`, plus `Backend`/`Schema` from
    /// the call itself; on any error the stored artifact is unchanged.
    pub async fn edit_narrative(
        &self,
        case: &Case,
        kind: ArtifactKind,
        instructions: &str,
        access: &dyn CaseAccess,
    ) -> Result<Artifact, EngineError> {
        if !access.can_modify(case.id) {
            return Err(EngineError::AccessDenied(case.id));
        }
        let instructions = instructions.trim();
        if instructions.is_empty() {
            return Err(EngineError::EmptyInstructions);
        }
        let blueprint = self.registry.resolve(kind)?;
        let hint = blueprint
            .narrative_edit_hint()
            .ok_or(EngineError::UnsupportedEdit(kind))?;

        let _guard = self.locks.acquire(case.id).await;
        let mut artifact = self
            .store
            .get(case.id, kind)
            .ok_or(EngineError::ArtifactNotFound {
                case_id: case.id,
                kind,
            })?;

        let payload = json!({
            "kind": kind.as_str(),
            "case_id": case.id.to_string(),
            "case_title": case.title,
            "current_title": artifact.title,
            "current_structured": artifact.structured.clone().unwrap_or_else(|| json!({})),
            "instructions": instructions,
        });
        let system = format!("{NARRATIVE_EDIT_SYSTEM_PROMPT}\n{hint}");
        let user = format!(
            "Here is the current structured document and the instructions for changing it.\n\
             Apply the smallest set of edits that fulfills the request.\n\
             Keep the JSON structure as close to the original as possible.\n\n\
             Data:\n{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );

        let request = ChatRequest::new(system, user, self.config.edit_model.clone())
            .with_temperature(self.config.temperature);
        let reply = self.backend.chat_json(request).await?;

        let proposed = match reply.value.get("structured") {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            Some(_) => {
                return Err(SchemaError::WrongType {
                    field: "structured",
                    expected: "an object",
                }
                .into())
            }
            None => return Err(SchemaError::MissingFields("structured".to_string()).into()),
        };

        // Same validator as initial generation, no bypass.
        let structured = blueprint.validate(&proposed)?;
        let rendered = blueprint.render(&structured, &case.title);

        artifact.title = rendered.title;
        artifact.content = rendered.content;
        artifact.structured = Some(structured);
        artifact.model_id = Some(reply.model);
        artifact.generation = GenerationStatus::Ready;
        artifact.error = None;
        artifact.touch();

        self.versions
            .snapshot(&artifact, Some(VersionReason::LlmEdit));
        self.store.upsert(artifact.clone());
        self.stats.lock().edits_applied += 1;
        tracing::debug!(case_id = %case.id, kind = %kind, "narrative edit applied");
        Ok(artifact)
    }

    /// Apply free-text edit instructions to a diagram artifact
    ///
    /// The backend receives the case context, the current source and the
    /// instructions and must answer a new `plantuml` source. The source
    /// is repaired for known malformed syntax and must keep both
    /// markers, otherwise the edit is rejected with no state change.
    /// Success re-derives the rendering link and records a
    /// `diagram_edit` version.
    ///
    /// # Errors
    /// `AccessDenied`, `EmptyInstructions`, `UnsupportedEdit` for
    /// narrative kinds, `ArtifactNotFound`, `InvalidDiagram` for a
    /// markerless reply, plus `Backend`/`Schema` from the call itself.
    pub async fn edit_diagram(
        &self,
        case: &Case,
        kind: ArtifactKind,
        instructions: &str,
        access: &dyn CaseAccess,
    ) -> Result<Artifact, EngineError> {
        if !access.can_modify(case.id) {
            return Err(EngineError::AccessDenied(case.id));
        }
        let instructions = instructions.trim();
        if instructions.is_empty() {
            return Err(EngineError::EmptyInstructions);
        }
        if !kind.is_diagram() {
            return Err(EngineError::UnsupportedEdit(kind));
        }

        let _guard = self.locks.acquire(case.id).await;
        let mut artifact = self
            .store
            .get(case.id, kind)
            .ok_or(EngineError::ArtifactNotFound {
                case_id: case.id,
                kind,
            })?;

        let snapshot = ContextSnapshot::build(case);
        let context = serde_json::to_string_pretty(snapshot.payload())
            .unwrap_or_else(|_| snapshot.canonical_payload());
        let current = current_diagram_source(&artifact);
        let user = format!(
            "Diagram kind: {kind}\n\
             Case: {case_title}\n\n\
             Case context JSON (client answers and clarifications):\n{context}\n\n\
             Current PlantUML source:\n```plantuml\n{current}\n```\n\n\
             Edit instructions:\n{instructions}\n\n\
             Produce the NEW PlantUML source taking into account the current source,\n\
             the case context and the instructions.\n\n\
             Reply with JSON only, with the \"plantuml\" field.",
            case_title = case.title,
        );

        let request = ChatRequest::new(
            DIAGRAM_EDIT_SYSTEM_PROMPT,
            user,
            self.config.diagram_edit_model.clone(),
        )
        .with_temperature(self.config.temperature);
        let reply = self.backend.chat_json(request).await?;

        let source = reply
            .value
            .get("plantuml")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if source.is_empty() {
            return Err(SchemaError::MissingFields("plantuml".to_string()).into());
        }

        let fixed = fix_known_syntax(source);
        if !has_markers(&fixed) {
            return Err(EngineError::InvalidDiagram);
        }

        // Keep sibling keys (notes) around the replaced source.
        let mut structured = match artifact.structured.take() {
            Some(Value::Object(map)) => Value::Object(map),
            _ => json!({}),
        };
        structured["plantuml"] = Value::String(fixed.clone());
        artifact.structured = Some(structured);
        artifact.content = fenced(&fixed);
        artifact.model_id = Some(reply.model);
        artifact.generation = GenerationStatus::Ready;
        artifact.error = None;
        artifact.diagram_url = self.derive_diagram_url(&artifact);
        artifact.touch();

        self.versions
            .snapshot(&artifact, Some(VersionReason::DiagramEdit));
        self.store.upsert(artifact.clone());
        self.stats.lock().edits_applied += 1;
        tracing::debug!(case_id = %case.id, kind = %kind, "diagram edit applied");
        Ok(artifact)
    }

    /// Copy an earlier version's state back onto the artifact
    ///
    /// The restored state is appended as a new `restore_version` version;
    /// history is never rewritten. Diagram kinds get their rendering
    /// link re-derived from the restored source.
    ///
    /// # Errors
    /// `AccessDenied`, `ArtifactNotFound` or `VersionNotFound`.
    pub async fn restore_version(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
        number: u32,
        access: &dyn CaseAccess,
    ) -> Result<Artifact, EngineError> {
        if !access.can_modify(case_id) {
            return Err(EngineError::AccessDenied(case_id));
        }

        let _guard = self.locks.acquire(case_id).await;
        let mut artifact = self
            .store
            .get(case_id, kind)
            .ok_or(EngineError::ArtifactNotFound { case_id, kind })?;
        let version =
            self.versions
                .get(artifact.id, number)
                .ok_or(EngineError::VersionNotFound {
                    artifact_id: artifact.id,
                    number,
                })?;

        artifact.title = version.title;
        artifact.content = version.content;
        artifact.structured = version.structured;
        artifact.generation = GenerationStatus::Ready;
        artifact.error = None;
        if kind.is_diagram() {
            artifact.diagram_url = self.derive_diagram_url(&artifact);
        }
        artifact.touch();

        self.versions
            .snapshot(&artifact, Some(VersionReason::RestoreVersion));
        self.store.upsert(artifact.clone());
        self.stats.lock().restores += 1;
        tracing::debug!(case_id = %case_id, kind = %kind, number, "version restored");
        Ok(artifact)
    }
}
