//! Diagram payload validation and rendering.
//!
//! BPMN and use-case replies are validated strictly; the context-diagram
//! prompt produces the widest range of shapes in practice, so its
//! validator coerces anything into the canonical `{plantuml, notes}`
//! payload instead of failing.

use caseforge_uml::{ensure_markers, strip_disallowed};
use serde_json::{json, Value};

use crate::{coerce_string_list, str_field, SchemaError, PLACEHOLDER};

/// Minimal valid diagram used when no source survives normalization.
#[must_use]
pub fn placeholder_diagram() -> String {
    format!("@startuml\ntitle {PLACEHOLDER}\n@enduml")
}

/// Reads the PlantUML source out of a validated diagram payload.
#[must_use]
pub fn diagram_source(structured: &Value) -> &str {
    structured
        .get("plantuml")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Normalization pipeline shared by every diagram kind.
///
/// Unsupported directives are stripped; if nothing survives, the
/// placeholder diagram is substituted, otherwise `@startuml`/`@enduml`
/// markers are guaranteed.
fn normalize_source(source: &str) -> String {
    let stripped = strip_disallowed(source);
    if stripped.is_empty() {
        placeholder_diagram()
    } else {
        ensure_markers(&stripped)
    }
}

/// Validates a strict diagram reply (BPMN and use-case kinds).
///
/// A missing or `null` `plantuml` field is tolerated as empty source,
/// which normalizes to the placeholder diagram.
///
/// # Errors
///
/// Returns [`SchemaError::NotAnObject`] for non-object replies and
/// [`SchemaError::WrongType`] when `plantuml` is present with a
/// non-string value.
pub fn validate_diagram(raw: &Value) -> Result<Value, SchemaError> {
    let Value::Object(map) = raw else {
        return Err(SchemaError::NotAnObject);
    };
    let source = match map.get("plantuml") {
        None | Some(Value::Null) => "",
        Some(Value::String(text)) => text.as_str(),
        Some(_) => {
            return Err(SchemaError::WrongType {
                field: "plantuml",
                expected: "a string",
            })
        }
    };
    let notes = coerce_string_list(map.get("notes"));
    Ok(json!({
        "plantuml": normalize_source(source),
        "notes": notes,
    }))
}

/// Validates a context-diagram reply.
///
/// Non-object replies are stringified and treated as diagram source.
/// Within objects the source may arrive under `plantuml` or `diagram`,
/// and non-string sources are stringified rather than rejected.
///
/// # Errors
///
/// Infallible in practice; the `Result` keeps the signature uniform
/// with the other validators.
pub fn validate_context_diagram(raw: &Value) -> Result<Value, SchemaError> {
    let Value::Object(map) = raw else {
        let source = match raw {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Ok(json!({
            "plantuml": normalize_source(&source),
            "notes": [],
        }));
    };
    let source = match map.get("plantuml").or_else(|| map.get("diagram")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    let notes = coerce_string_list(map.get("notes"));
    Ok(json!({
        "plantuml": normalize_source(&source),
        "notes": notes,
    }))
}

fn notes_list(structured: &Value) -> Vec<&str> {
    structured
        .get("notes")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn diagram_markdown(heading: &str, structured: &Value) -> String {
    let source = str_field(structured, "plantuml");
    let notes = notes_list(structured);

    let mut lines: Vec<String> = vec![heading.to_string(), String::new()];
    if !notes.is_empty() {
        lines.push("## Notes".to_string());
        for note in &notes {
            lines.push(format!("- {note}"));
        }
        lines.push(String::new());
    }
    lines.push("## Diagram (PlantUML)".to_string());
    lines.push(String::new());
    lines.push("```plantuml".to_string());
    lines.push(source.to_string());
    lines.push("```".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Renders a validated BPMN payload as the stored Markdown body.
#[must_use]
pub fn render_bpmn(structured: &Value) -> String {
    diagram_markdown("# BPMN Diagram", structured)
}

/// Renders a validated context-diagram payload as the stored Markdown body.
#[must_use]
pub fn render_context_diagram(structured: &Value) -> String {
    diagram_markdown("# Context Diagram", structured)
}

/// Renders a validated use-case payload as the stored Markdown body.
///
/// Unlike the other diagram kinds this body carries no top-level
/// heading; notes precede the fenced block directly.
#[must_use]
pub fn render_use_case(structured: &Value) -> String {
    let source = str_field(structured, "plantuml");
    let notes = notes_list(structured);

    let mut lines: Vec<String> = Vec::new();
    if !notes.is_empty() {
        lines.push("### Diagram notes\n".to_string());
        for note in &notes {
            lines.push(format!("- {note}"));
        }
        lines.push(String::new());
    }
    lines.push("```plantuml".to_string());
    lines.push(source.to_string());
    lines.push("```".to_string());
    lines.join("\n")
}
