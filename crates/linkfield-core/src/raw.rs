//! Raw input supplied for one validation call.
//!
//! Raw input is untyped: a record of field values, a pre-built instance, or
//! any other JSON value. Pre-validators rewrite it in place before it is
//! lowered to plain JSON and handed to the schema validator.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};

use crate::instance::ModelInstance;

/// One field value inside a [`RawRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Json(Value),
    Instance(ModelInstance),
}

impl RawValue {
    /// The JSON object held by this value, if it is one.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub const fn as_object_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            Self::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Instance(instance) => instance.into_value(),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<ModelInstance> for RawValue {
    fn from(instance: ModelInstance) -> Self {
        Self::Instance(instance)
    }
}

/// Insertion-ordered mapping of field name to raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    values: IndexMap<String, RawValue>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RawValue> {
        self.values.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn entry(&mut self, name: String) -> Entry<'_, String, RawValue> {
        self.values.entry(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut RawValue)> {
        self.values.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lower to a JSON object, serialising any instances.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(
            self.values
                .into_iter()
                .map(|(k, v)| (k, v.into_value()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            values: map.into_iter().map(|(k, v)| (k, RawValue::Json(v))).collect(),
        }
    }
}

/// Top-level input for one validation call.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A mapping of field values; the only shape pre-validators rewrite.
    Record(RawRecord),
    /// An already-validated instance passed as the whole payload.
    Instance(ModelInstance),
    /// Anything else; left to the schema validator to reject.
    Other(Value),
}

impl RawInput {
    #[must_use]
    pub const fn as_record(&self) -> Option<&RawRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub const fn as_record_mut(&mut self) -> Option<&mut RawRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Record(record) => record.into_value(),
            Self::Instance(instance) => instance.into_value(),
            Self::Other(value) => value,
        }
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Record(map.into()),
            other => Self::Other(other),
        }
    }
}

impl From<RawRecord> for RawInput {
    fn from(record: RawRecord) -> Self {
        Self::Record(record)
    }
}

impl From<ModelInstance> for RawInput {
    fn from(instance: ModelInstance) -> Self {
        Self::Instance(instance)
    }
}
