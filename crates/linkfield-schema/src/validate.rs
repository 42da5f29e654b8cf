//! Validation pipeline: pre-validators, JSON Schema check, instance build.

use jsonschema::error::ValidationErrorKind;
use linkfield_core::{ModelInstance, RawInput, RawValue};
use serde_json::{Map, Value, json};

use crate::error::{ErrorKind, FieldError, SchemaError, ValidationErrors};
use crate::registry::{ModelRegistry, SCHEMA_DIALECT};
use crate::walk::map_models;

impl ModelRegistry {
    /// Validate raw input as model `name` and build an instance.
    ///
    /// Pre-validators run first, on the top-level input and then on every
    /// nested record typed as a model. The rewritten input is checked
    /// against [`ModelRegistry::json_schema`]; on success undeclared keys
    /// are dropped (unless `strip_unknown_fields` is off) and absent
    /// optional fields get their defaults. An instance of `name` passed as
    /// the whole input is returned unchanged.
    ///
    /// # Errors
    ///
    /// - `SchemaError::NotFound` if `name` is not registered
    /// - `SchemaError::Generation` if the assembled schema does not compile
    /// - `SchemaError::Validation` listing every located failure
    pub fn validate(&self, name: &str, input: impl Into<RawInput>) -> Result<ModelInstance, SchemaError> {
        if !self.contains(name) {
            return Err(SchemaError::NotFound(name.to_string()));
        }

        let input = match input.into() {
            RawInput::Instance(instance) if instance.model_name() == name => return Ok(instance),
            other => other,
        };

        let prepared = self.prepare(name, input).into_value();
        let schema = self.json_schema(name)?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<FieldError> = validator
            .iter_errors(&prepared)
            .map(|e| field_error(&e))
            .collect();
        if !errors.is_empty() {
            tracing::debug!(model = name, errors = errors.len(), "validation failed");
            return Err(SchemaError::Validation(ValidationErrors {
                model: name.to_string(),
                errors,
            }));
        }

        match self.build(name, prepared) {
            Value::Object(values) => Ok(ModelInstance::new(name, values)),
            other => Err(SchemaError::Generation(format!(
                "validated input for '{name}' is not an object: {other}"
            ))),
        }
    }

    /// Run pre-validators for `name`, then recurse into nested model records.
    pub(crate) fn prepare(&self, name: &str, input: RawInput) -> RawInput {
        let Some(entry) = self.entry(name) else {
            return input;
        };
        let model = entry.model();

        let mut input = entry
            .pre_validators()
            .iter()
            .fold(input, |input, step| step(self, model, input));

        if let Some(record) = input.as_record_mut() {
            for (field, raw) in record.iter_mut() {
                let (Some(def), RawValue::Json(value)) = (model.get(field), raw) else {
                    continue;
                };
                let taken = std::mem::take(value);
                *value = map_models(self, &def.schema, taken, &mut |nested: &str, v| {
                    self.prepare(nested, RawInput::from(v)).into_value()
                });
            }
        }
        input
    }

    /// Whether `value` satisfies the annotation `schema`, with every
    /// registered model and definition in scope.
    pub(crate) fn accepts(&self, schema: &Value, value: &Value) -> bool {
        let document = json!({
            "$schema": SCHEMA_DIALECT,
            "$defs": self.defs(),
            "allOf": [schema],
        });
        jsonschema::validator_for(&document).is_ok_and(|validator| validator.is_valid(value))
    }

    /// Shape a validated record as model `name`: declared fields in order,
    /// defaults for absent optional fields, nested records shaped likewise.
    fn build(&self, name: &str, value: Value) -> Value {
        let Some(model) = self.get(name) else {
            return value;
        };
        let mut raw = match value {
            Value::Object(raw) => raw,
            other => return other,
        };

        let mut values = Map::new();
        for (field, def) in model.fields() {
            let field_value = match raw.remove(field) {
                Some(v) => v,
                None => match &def.default {
                    Some(default) => default.clone(),
                    None => continue,
                },
            };
            let shaped = map_models(self, &def.schema, field_value, &mut |nested: &str, v| {
                self.build(nested, v)
            });
            values.insert(field.clone(), shaped);
        }

        if !raw.is_empty() {
            if self.config().validation.strip_unknown_fields {
                tracing::trace!(model = name, dropped = raw.len(), "dropped undeclared fields");
            } else {
                values.extend(raw);
            }
        }
        Value::Object(values)
    }
}

fn field_error(error: &jsonschema::ValidationError<'_>) -> FieldError {
    let mut loc = pointer_segments(&error.instance_path.to_string());
    let kind = match &error.kind {
        ValidationErrorKind::Required { property } => {
            loc.push(
                property
                    .as_str()
                    .map_or_else(|| property.to_string(), str::to_string),
            );
            ErrorKind::Missing
        }
        _ => ErrorKind::Invalid,
    };
    FieldError {
        loc,
        kind,
        message: error.to_string(),
    }
}

/// Split a JSON pointer into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}
