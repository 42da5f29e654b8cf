//! Uniform read access to sibling values.
//!
//! A sibling holding a linked model's data can be a raw JSON object or an
//! already-built [`ModelInstance`]. Both answer the same two questions:
//! is the field there, and what is its value. Presence is separate from the
//! value so `null`, `0`, `""` and `false` are still copied.

use serde_json::{Map, Value};

use crate::instance::ModelInstance;
use crate::raw::RawValue;

pub trait FieldSource {
    fn has_field(&self, name: &str) -> bool;
    fn get_field(&self, name: &str) -> Option<&Value>;
}

/// Key membership.
impl FieldSource for Map<String, Value> {
    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn get_field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Attribute existence.
impl FieldSource for ModelInstance {
    fn has_field(&self, name: &str) -> bool {
        Self::has_field(self, name)
    }

    fn get_field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl RawValue {
    /// The field source behind this value: a JSON object or an instance.
    /// Scalars, arrays and `null` are not sources.
    #[must_use]
    pub fn as_field_source(&self) -> Option<&dyn FieldSource> {
        match self {
            Self::Json(Value::Object(map)) => Some(map),
            Self::Json(_) => None,
            Self::Instance(instance) => Some(instance),
        }
    }
}
