//! Model types and field definitions.
//!
//! A [`ModelType`] is a named record schema: an insertion-ordered list of
//! fields, each carrying a JSON Schema fragment as its type annotation.
//! References between models use the `#/$defs/<name>` convention emitted by
//! `schemars`, so a field typed as another model is written
//! `{"$ref": "#/$defs/Foo"}` (see [`model_ref`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Prefix used by model references inside field annotations.
pub const DEFS_PREFIX: &str = "#/$defs/";

/// Build the annotation that refers to the model named `name`.
#[must_use]
pub fn model_ref(name: &str) -> Value {
    json!({ "$ref": format!("{DEFS_PREFIX}{name}") })
}

/// Model name targeted by a `$ref` annotation, if it uses the `$defs` form.
#[must_use]
pub fn ref_target(annotation: &Value) -> Option<&str> {
    annotation
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.strip_prefix(DEFS_PREFIX))
}

/// Where a field definition came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Written by hand on the model.
    Declared,
    /// Copied from `model.field` by a link declaration.
    Linked { model: String, field: String },
}

/// A single field: annotation, required flag, and default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// JSON Schema fragment describing the field's type.
    pub schema: Value,
    /// Whether the field must be present in the input.
    pub required: bool,
    /// Value used when an optional field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub origin: FieldOrigin,
}

impl FieldDef {
    /// A field that must be supplied.
    #[must_use]
    pub const fn required(schema: Value) -> Self {
        Self {
            schema,
            required: true,
            default: None,
            origin: FieldOrigin::Declared,
        }
    }

    /// An optional field defaulting to `null`.
    ///
    /// The annotation is widened to accept `null` so an explicit `null`
    /// validates the same way the default does.
    #[must_use]
    pub fn optional(schema: Value) -> Self {
        Self {
            schema: json!({ "anyOf": [schema, { "type": "null" }] }),
            required: false,
            default: Some(Value::Null),
            origin: FieldOrigin::Declared,
        }
    }

    /// An optional field with an explicit default.
    #[must_use]
    pub const fn with_default(schema: Value, default: Value) -> Self {
        Self {
            schema,
            required: false,
            default: Some(default),
            origin: FieldOrigin::Declared,
        }
    }

    /// Whether this field was produced by a link declaration.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        matches!(self.origin, FieldOrigin::Linked { .. })
    }
}

/// A named record schema with insertion-ordered fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelType {
    name: String,
    fields: IndexMap<String, FieldDef>,
}

impl ModelType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field declaration. Redeclaring a name replaces the
    /// definition but keeps the original position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, FieldDef> {
        &self.fields
    }

    /// Mutable access for construction-time passes (link synthesis).
    pub const fn fields_mut(&mut self) -> &mut IndexMap<String, FieldDef> {
        &mut self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields written on the model itself, in declaration order.
    pub fn declared_fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields
            .iter()
            .filter(|(_, def)| !def.is_linked())
            .map(|(name, def)| (name.as_str(), def))
    }

    /// Names of the fields that must be supplied.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.required)
            .map(|(name, _)| name.as_str())
    }

    /// Object schema for this model, suitable for a `$defs` entry.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, def) in &self.fields {
            let mut schema = def.schema.clone();
            if let (Some(default), Value::Object(obj)) = (&def.default, &mut schema) {
                obj.entry("default").or_insert_with(|| default.clone());
            }
            properties.insert(name.clone(), schema);
        }
        let required: Vec<Value> = self
            .required_fields()
            .map(|name| Value::String(name.to_string()))
            .collect();

        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
