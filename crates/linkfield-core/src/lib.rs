//! # linkfield-core
//!
//! Core types shared by every linkfield crate.
//!
//! This crate provides:
//! - `ModelType` and `FieldDef`: named, ordered record schemas whose field
//!   annotations are JSON Schema fragments
//! - `RawInput`, `RawRecord`, `RawValue`: the untyped data handed to a model
//!   before validation
//! - `ModelInstance`: a validated record
//! - `FieldSource`: uniform presence/value access over mappings and instances
//! - Cross-cutting error types

pub mod errors;
pub mod instance;
pub mod model;
pub mod raw;
pub mod source;

pub use errors::CoreError;
pub use instance::ModelInstance;
pub use model::{DEFS_PREFIX, FieldDef, FieldOrigin, ModelType, model_ref, ref_target};
pub use raw::{RawInput, RawRecord, RawValue};
pub use source::FieldSource;
