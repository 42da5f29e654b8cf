//! Schema, link, and validation error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors from the model registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested model name was not found in the registry.
    #[error("Model not found: {0}")]
    NotFound(String),

    /// A model with this name is already registered.
    #[error("Model already registered: {0}")]
    Duplicate(String),

    /// A link declaration names a model that is not registered.
    #[error("Link '{prefix}' refers to unknown model '{model}'")]
    UnknownModel { prefix: String, model: String },

    /// A link declaration subset names a field the source model lacks.
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// A link declaration entry is neither a model nor a model plus fields.
    #[error("Malformed link declaration for prefix '{prefix}': {value}")]
    MalformedLink { prefix: String, value: String },

    /// A synthesized field name is already taken on the destination model.
    #[error("Linked field '{field}' collides with an existing field on '{model}'")]
    FieldCollision { model: String, field: String },

    /// An imported JSON Schema cannot be turned into a model.
    #[error("Invalid model schema for '{model}': {reason}")]
    InvalidModelSchema { model: String, reason: String },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// Input did not pass validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

/// What went wrong at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was absent.
    Missing,
    /// A value was present but did not match its annotation.
    Invalid,
}

/// A single located validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path from the validated model to the failing value; for missing
    /// fields the last segment is the field name.
    pub loc: Vec<String>,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    /// Dotted path, e.g. `bar.f_a`.
    #[must_use]
    pub fn path(&self) -> String {
        self.loc.join(".")
    }
}

/// All failures found while validating one input against one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub model: String,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Dotted paths of every error, in report order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::path).collect()
    }

    /// Errors of the given kind.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s) for {}", self.errors.len(), self.model)?;
        for error in &self.errors {
            let path = error.path();
            let path = if path.is_empty() { "<root>" } else { path.as_str() };
            write!(f, "\n  {path}: {}", error.message)?;
        }
        Ok(())
    }
}
