//! Turn generated JSON Schemas into model types.

use std::collections::HashSet;

use linkfield_core::{DEFS_PREFIX, FieldDef, ModelType};
use serde_json::Value;

use crate::error::SchemaError;

/// Build a [`ModelType`] from an object schema such as `schemars` emits.
///
/// Properties keep their order. Properties listed in `required` become
/// required fields; the rest default to their `default` keyword, or `null`.
///
/// # Errors
///
/// Returns `SchemaError::InvalidModelSchema` if `schema` has no `properties`
/// object.
pub fn model_from_json_schema(name: &str, schema: &Value) -> Result<ModelType, SchemaError> {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::InvalidModelSchema {
            model: name.to_string(),
            reason: "expected an object schema with properties".into(),
        })?;

    let required: HashSet<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let model = properties
        .iter()
        .fold(ModelType::new(name), |model, (field, property)| {
            let def = if required.contains(field.as_str()) {
                FieldDef::required(property.clone())
            } else {
                let default = property.get("default").cloned().unwrap_or(Value::Null);
                FieldDef::with_default(property.clone(), default)
            };
            model.field(field.clone(), def)
        });
    Ok(model)
}

/// Point every root self-reference (`"$ref": "#"`, as generated for
/// recursive types) at the model named `name`.
pub(crate) fn resolve_root_refs(schema: &mut Value, name: &str) {
    match schema {
        Value::Object(map) => {
            if map.get("$ref").and_then(Value::as_str) == Some("#") {
                map.insert("$ref".into(), Value::String(format!("{DEFS_PREFIX}{name}")));
            }
            for value in map.values_mut() {
                resolve_root_refs(value, name);
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_root_refs(item, name);
            }
        }
        _ => {}
    }
}
