//! Generation-service schema derived from [`ProductRecord`].
//!
//! Strict structured-output mode on the model service accepts only a subset
//! of JSON Schema:
//! 1. `additionalProperties: false` on every object schema
//! 2. every property listed in `required` (nullability is carried by `null`
//!    in the property's type instead)
//! 3. no `$ref`, no `allOf`, no `format` keywords
//!
//! [`strict_schema`] rewrites the `schemars` output into that subset.

use schemars::{schema_for, JsonSchema};
use serde_json::{Map, Value};

use crate::product::ProductRecord;

/// Name the schema is registered under in the generation request.
pub const PRODUCT_SCHEMA_NAME: &str = "product";

/// Strict-mode schema for [`ProductRecord`].
#[must_use]
pub fn product_schema() -> Value {
    strict_schema::<ProductRecord>()
}

/// Builds a strict-mode schema for any `JsonSchema` type.
#[must_use]
pub fn strict_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_default();

    let definitions = match &mut value {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions")
        }
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }
    flatten_single_all_of(&mut value);
    strip_formats(&mut value);
    close_objects(&mut value);

    value
}

/// Replaces every `{"$ref": "#/definitions/X"}` with the definition of `X`.
///
/// Sibling keys of the `$ref` (schemars puts `description` there) are kept.
fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref").cloned() {
                if let Some(def) = path
                    .strip_prefix("#/definitions/")
                    .and_then(|name| definitions.get(name))
                {
                    map.remove("$ref");
                    let mut inlined = def.clone();
                    inline_refs(&mut inlined, definitions);
                    if let Value::Object(def_map) = inlined {
                        for (k, v) in def_map {
                            map.entry(k).or_insert(v);
                        }
                    }
                    return;
                }
            }
            for v in map.values_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// Merges `{"description": d, "allOf": [S]}` into `S` with description `d`.
fn flatten_single_all_of(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let single = matches!(map.get("allOf"), Some(Value::Array(parts)) if parts.len() == 1);
            if single {
                if let Some(Value::Array(mut parts)) = map.remove("allOf") {
                    if let Some(Value::Object(inner)) = parts.pop() {
                        merge_missing(map, inner);
                    }
                }
            }
            for v in map.values_mut() {
                flatten_single_all_of(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_single_all_of(item);
            }
        }
        _ => {}
    }
}

fn merge_missing(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (k, v) in source {
        target.entry(k).or_insert(v);
    }
}

fn strip_formats(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if matches!(map.get("format"), Some(Value::String(_))) {
                map.remove("format");
            }
            for v in map.values_mut() {
                strip_formats(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_formats(item);
            }
        }
        _ => {}
    }
}

/// Adds `additionalProperties: false` and a complete `required` list to
/// every object schema.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_type(map.get("type")) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let all_keys = props.keys().cloned().map(Value::String).collect();
                    map.insert("required".to_string(), Value::Array(all_keys));
                }
            }
            for v in map.values_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn is_object_type(ty: Option<&Value>) -> bool {
    match ty {
        Some(Value::String(s)) => s == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    }
}
