//! Vision document validation and rendering.

use serde_json::{Map, Value};

use crate::{bullets, clean_string, coerce_string_list, require_keys, str_field, SchemaError};

/// Required top-level keys of a vision reply.
pub const VISION_KEYS: [&str; 7] = [
    "title",
    "problem_statement",
    "business_goals",
    "target_users",
    "expected_outcomes",
    "success_criteria",
    "risks_and_limitations",
];

const VISION_LISTS: [&str; 5] = [
    "business_goals",
    "target_users",
    "expected_outcomes",
    "success_criteria",
    "risks_and_limitations",
];

/// Validates a vision reply into the canonical structured payload.
///
/// # Errors
///
/// Returns [`SchemaError::NotAnObject`] for non-object replies,
/// [`SchemaError::MissingFields`] when required keys are absent and
/// [`SchemaError::WrongType`] when a prose field is not a string.
pub fn validate_vision(raw: &Value) -> Result<Value, SchemaError> {
    let Value::Object(map) = raw else {
        return Err(SchemaError::NotAnObject);
    };
    require_keys(map, &VISION_KEYS)?;

    let mut out = Map::new();
    out.insert(
        "title".to_string(),
        Value::String(clean_string("title", &raw["title"])?),
    );
    out.insert(
        "problem_statement".to_string(),
        Value::String(clean_string("problem_statement", &raw["problem_statement"])?),
    );
    for key in VISION_LISTS {
        let items = coerce_string_list(map.get(key))
            .into_iter()
            .map(Value::String)
            .collect();
        out.insert(key.to_string(), Value::Array(items));
    }
    Ok(Value::Object(out))
}

/// Renders a validated vision payload as the stored Markdown body.
#[must_use]
pub fn render_vision(structured: &Value) -> String {
    format!(
        "# Vision\n\
         \n\
         ## {title}\n\
         \n\
         ### Problem statement\n\
         {problem}\n\
         \n\
         ### Business goals\n\
         {goals}\n\
         \n\
         ### Target users\n\
         {users}\n\
         \n\
         ### Expected outcomes\n\
         {outcomes}\n\
         \n\
         ### Success criteria\n\
         {criteria}\n\
         \n\
         ### Risks and limitations\n\
         {risks}\n",
        title = str_field(structured, "title"),
        problem = str_field(structured, "problem_statement"),
        goals = bullets(structured, "business_goals"),
        users = bullets(structured, "target_users"),
        outcomes = bullets(structured, "expected_outcomes"),
        criteria = bullets(structured, "success_criteria"),
        risks = bullets(structured, "risks_and_limitations"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLACEHOLDER;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_reply() -> Value {
        json!({
            "title": "Customer portal",
            "problem_statement": "Orders are tracked by hand.",
            "business_goals": ["Cut order handling time"],
            "target_users": ["Sales managers", "Customers"],
            "expected_outcomes": ["Self-service ordering"],
            "success_criteria": ["90% of orders placed online"],
            "risks_and_limitations": ["Legacy ERP integration"],
        })
    }

    #[test]
    fn accepts_a_complete_reply() {
        let structured = validate_vision(&full_reply()).unwrap();
        assert_eq!(structured["title"], "Customer portal");
        assert_eq!(structured["target_users"], json!(["Sales managers", "Customers"]));
    }

    #[test]
    fn rejects_non_objects() {
        let err = validate_vision(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject));
    }

    #[test]
    fn reports_all_missing_fields_at_once() {
        let err = validate_vision(&json!({"title": "x"})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("problem_statement"));
        assert!(message.contains("risks_and_limitations"));
    }

    #[test]
    fn blank_title_becomes_placeholder() {
        let mut reply = full_reply();
        reply["title"] = json!("   ");
        let structured = validate_vision(&reply).unwrap();
        assert_eq!(structured["title"], PLACEHOLDER);
    }

    #[test]
    fn non_string_prose_field_is_an_error() {
        let mut reply = full_reply();
        reply["problem_statement"] = json!({"text": "nested"});
        let err = validate_vision(&reply).unwrap_err();
        assert_eq!(err.to_string(), "field problem_statement must be a string");
    }

    #[test]
    fn non_list_goal_field_coerces_to_empty() {
        let mut reply = full_reply();
        reply["business_goals"] = json!("just one goal");
        let structured = validate_vision(&reply).unwrap();
        assert_eq!(structured["business_goals"], json!([]));
    }

    #[test]
    fn renders_every_section() {
        let structured = validate_vision(&full_reply()).unwrap();
        let content = render_vision(&structured);
        assert_eq!(
            content,
            "# Vision\n\
             \n\
             ## Customer portal\n\
             \n\
             ### Problem statement\n\
             Orders are tracked by hand.\n\
             \n\
             ### Business goals\n\
             - Cut order handling time\n\
             \n\
             ### Target users\n\
             - Sales managers\n\
             - Customers\n\
             \n\
             ### Expected outcomes\n\
             - Self-service ordering\n\
             \n\
             ### Success criteria\n\
             - 90% of orders placed online\n\
             \n\
             ### Risks and limitations\n\
             - Legacy ERP integration\n"
        );
    }

    #[test]
    fn renders_placeholder_bullet_for_empty_lists() {
        let mut reply = full_reply();
        reply["risks_and_limitations"] = json!([]);
        let structured = validate_vision(&reply).unwrap();
        let content = render_vision(&structured);
        assert!(content.contains(&format!("### Risks and limitations\n- {PLACEHOLDER}")));
    }
}
