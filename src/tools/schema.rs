//! Reduction of MCP input schemas to engine-acceptable parameter schemas.
//!
//! Function declarations reject schema-metadata keywords, so these are
//! stripped at every depth. A schema without a top-level `properties` map is
//! replaced by the canonical empty object schema.

use serde_json::{json, Map, Value};

/// Keys dropped from every object node
pub const DENIED_KEYS: &[&str] = &[
    "additionalProperties",
    "additional_properties",
    "$schema",
    "$id",
    "$ref",
];

/// Sanitizes a tool's declared input schema. Pure and idempotent.
pub fn sanitize(schema: &Value) -> Value {
    let cleaned = strip(schema);
    match &cleaned {
        Value::Object(map) if map.contains_key("properties") => cleaned,
        _ => empty_object_schema(),
    }
}

/// `{type: "object", properties: {}, required: []}`
pub fn empty_object_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn strip(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_object(map)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Value::Object(strip_object(map)),
                    other => other.clone(),
                })
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn strip_object(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !DENIED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), strip(value)))
        .collect()
}
