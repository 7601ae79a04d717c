//! Schema validation and rendering for generated artifact payloads.
//!
//! Every chat backend reply is an untyped [`serde_json::Value`]. This crate
//! turns those replies into the canonical structured payload for each
//! artifact kind and renders the payload into the Markdown body that is
//! stored on the artifact.
//!
//! # Core Concepts
//!
//! - **Validation**: [`validate_vision`], [`validate_scope`],
//!   [`validate_diagram`] and [`validate_context_diagram`] check required
//!   fields and coerce loosely-typed replies into a stable shape.
//! - **Coercion rules**: list fields accept only arrays; anything else
//!   becomes an empty list, and non-text or blank elements are dropped.
//!   Required prose fields must be strings; blank ones are replaced with
//!   [`PLACEHOLDER`].
//! - **Rendering**: [`render_vision`], [`render_scope`], [`render_bpmn`],
//!   [`render_context_diagram`] and [`render_use_case`] produce the
//!   Markdown stored as artifact content.
//!
//! Validation failures are reported as [`SchemaError`] so the caller can
//! mark the artifact as failed without aborting the rest of a batch.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod diagram;
mod scope;
mod vision;

pub use diagram::{
    diagram_source, placeholder_diagram, render_bpmn, render_context_diagram, render_use_case,
    validate_context_diagram, validate_diagram,
};
pub use scope::{render_scope, validate_scope, SCOPE_KEYS};
pub use vision::{render_vision, validate_vision, VISION_KEYS};

use serde_json::Value;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text substituted for required prose fields the model left blank.
pub const PLACEHOLDER: &str = "Requires clarification from source data";

/// Validation failure for a backend reply.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The reply was not a JSON object.
    #[error("response must be a JSON object")]
    NotAnObject,

    /// One or more required fields were absent.
    #[error("missing required fields: {0}")]
    MissingFields(String),

    /// A field was present with an unexpected type.
    #[error("field {field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Fails with [`SchemaError::MissingFields`] naming every absent key.
fn require_keys(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingFields(missing.join(", ")))
    }
}

/// Coerces a required prose field, substituting [`PLACEHOLDER`] for blanks.
fn clean_string(field: &'static str, value: &Value) -> Result<String, SchemaError> {
    let Value::String(text) = value else {
        return Err(SchemaError::WrongType {
            field,
            expected: "a string",
        });
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(PLACEHOLDER.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Coerces a list field: non-arrays become empty, non-text and blank
/// elements are dropped, surviving elements are trimmed.
fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads a string field out of a validated payload for rendering.
fn str_field<'a>(structured: &'a Value, key: &str) -> &'a str {
    structured
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
}

/// Renders a list field as Markdown bullets, one per line.
///
/// An empty list renders as a single [`PLACEHOLDER`] bullet so every
/// section of the document is visibly present.
fn bullets(structured: &Value, key: &str) -> String {
    let items: Vec<&str> = structured
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if items.is_empty() {
        return format!("- {PLACEHOLDER}");
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
