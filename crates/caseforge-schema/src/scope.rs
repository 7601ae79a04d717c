//! Scope document validation and rendering.

use serde_json::{Map, Value};

use crate::{bullets, clean_string, coerce_string_list, require_keys, str_field, SchemaError};

/// Required top-level keys of a scope reply.
pub const SCOPE_KEYS: [&str; 7] = [
    "summary",
    "in_scope",
    "out_of_scope",
    "business_processes_in_scope",
    "systems_in_scope",
    "assumptions",
    "constraints",
];

const SCOPE_LISTS: [&str; 6] = [
    "in_scope",
    "out_of_scope",
    "business_processes_in_scope",
    "systems_in_scope",
    "assumptions",
    "constraints",
];

/// Validates a scope reply into the canonical structured payload.
///
/// # Errors
///
/// Returns [`SchemaError::NotAnObject`] for non-object replies,
/// [`SchemaError::MissingFields`] when required keys are absent and
/// [`SchemaError::WrongType`] when `summary` is not a string.
pub fn validate_scope(raw: &Value) -> Result<Value, SchemaError> {
    let Value::Object(map) = raw else {
        return Err(SchemaError::NotAnObject);
    };
    require_keys(map, &SCOPE_KEYS)?;

    let mut out = Map::new();
    out.insert(
        "summary".to_string(),
        Value::String(clean_string("summary", &raw["summary"])?),
    );
    for key in SCOPE_LISTS {
        let items = coerce_string_list(map.get(key))
            .into_iter()
            .map(Value::String)
            .collect();
        out.insert(key.to_string(), Value::Array(items));
    }
    Ok(Value::Object(out))
}

/// Renders a validated scope payload as the stored Markdown body.
#[must_use]
pub fn render_scope(structured: &Value) -> String {
    format!(
        "# Scope\n\
         \n\
         ## Summary\n\
         {summary}\n\
         \n\
         ## In scope\n\
         {in_scope}\n\
         \n\
         ## Out of scope\n\
         {out_of_scope}\n\
         \n\
         ## Business processes in scope\n\
         {processes}\n\
         \n\
         ## Systems in scope\n\
         {systems}\n\
         \n\
         ## Assumptions\n\
         {assumptions}\n\
         \n\
         ## Constraints\n\
         {constraints}\n",
        summary = str_field(structured, "summary"),
        in_scope = bullets(structured, "in_scope"),
        out_of_scope = bullets(structured, "out_of_scope"),
        processes = bullets(structured, "business_processes_in_scope"),
        systems = bullets(structured, "systems_in_scope"),
        assumptions = bullets(structured, "assumptions"),
        constraints = bullets(structured, "constraints"),
    )
}
