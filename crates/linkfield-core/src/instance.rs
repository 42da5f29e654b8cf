//! Validated model instances.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// A record that passed validation for the model it names.
///
/// Every declared field of the model is present in `values`; absent optional
/// fields carry their default. Nested model-typed fields are stored as JSON
/// objects and can be viewed as instances with [`ModelInstance::nested`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInstance {
    model: String,
    values: Map<String, Value>,
}

impl ModelInstance {
    #[must_use]
    pub fn new(model: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            model: model.into(),
            values,
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Attribute existence: true for every field the instance carries,
    /// whatever its value.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    #[must_use]
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// View a record-valued field as an instance of `model`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::FieldNotFound` if the field is absent and
    /// `CoreError::NotARecord` if it does not hold a JSON object.
    pub fn nested(&self, field: &str, model: &str) -> Result<Self, CoreError> {
        match self.values.get(field) {
            Some(Value::Object(values)) => Ok(Self::new(model, values.clone())),
            Some(_) => Err(CoreError::NotARecord {
                model: self.model.clone(),
                field: field.to_string(),
            }),
            None => Err(CoreError::FieldNotFound {
                model: self.model.clone(),
                field: field.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
