//! Canonical JSON serialization
//!
//! The fingerprint must not depend on map insertion order, so payloads are
//! serialized with sorted object keys and compact separators before hashing.

use serde_json::Value;
use std::collections::BTreeMap;

/// Serialize a JSON value with lexicographically sorted object keys,
/// `,`/`:` separators and no whitespace. Non-ASCII text is kept as-is.
#[must_use]
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Display on Value emits the JSON-escaped, quoted form
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&str, &Value> =
                map.iter().map(|(k, v)| (k.as_str(), v)).collect();
            let parts: Vec<String> = sorted
                .into_iter()
                .map(|(k, v)| {
                    format!("{}:{}", Value::from(k), to_canonical_json(v))
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys() {
        let value = json!({"zebra": 1, "alpha": 2, "mid": 3});
        assert_eq!(
            to_canonical_json(&value),
            r#"{"alpha":2,"mid":3,"zebra":1}"#
        );
    }

    #[test]
    fn compact_separators() {
        let value = json!({"a": [1, 2], "b": {"c": null}});
        assert_eq!(to_canonical_json(&value), r#"{"a":[1,2],"b":{"c":null}}"#);
    }

    #[test]
    fn escapes_strings() {
        let value = json!({"text": "line1\nline2 \"quoted\""});
        assert_eq!(
            to_canonical_json(&value),
            r#"{"text":"line1\nline2 \"quoted\""}"#
        );
    }

    #[test]
    fn preserves_non_ascii() {
        let value = json!({"title": "Портал заявок"});
        assert_eq!(to_canonical_json(&value), r#"{"title":"Портал заявок"}"#);
    }

    #[test]
    fn nested_objects_sorted_recursively() {
        let value = json!({"outer": {"b": 1, "a": 2}});
        assert_eq!(to_canonical_json(&value), r#"{"outer":{"a":2,"b":1}}"#);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(to_canonical_json(&json!(null)), "null");
        assert_eq!(to_canonical_json(&json!(true)), "true");
        assert_eq!(to_canonical_json(&json!(42)), "42");
        assert_eq!(to_canonical_json(&json!("plain")), "\"plain\"");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn insertion_order_never_matters(
                a in "[a-z]{1,8}",
                b in "[a-z]{1,8}",
                v1 in any::<i64>(),
                v2 in any::<i64>(),
            ) {
                prop_assume!(a != b);

                let mut forward = serde_json::Map::new();
                forward.insert(a.clone(), json!(v1));
                forward.insert(b.clone(), json!(v2));

                let mut reverse = serde_json::Map::new();
                reverse.insert(b, json!(v2));
                reverse.insert(a, json!(v1));

                prop_assert_eq!(
                    to_canonical_json(&Value::Object(forward)),
                    to_canonical_json(&Value::Object(reverse))
                );
            }
        }
    }
}
