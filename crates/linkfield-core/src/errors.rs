//! Cross-cutting error types for linkfield.
//!
//! Schema and validation errors live in `linkfield-schema`; configuration
//! errors live in `linkfield-config`.

use thiserror::Error;

/// Errors raised while building or reading core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A nested value was requested from a field that does not hold a record.
    #[error("Field '{field}' of model '{model}' is not a record")]
    NotARecord { model: String, field: String },

    /// The requested field is not part of the instance.
    #[error("Field not found: {model}.{field}")]
    FieldNotFound { model: String, field: String },
}
