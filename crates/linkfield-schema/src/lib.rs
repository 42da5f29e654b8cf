//! # linkfield-schema
//!
//! Linked fields for JSON Schema models.
//!
//! A destination model can declare that some of its fields mirror fields of
//! other models. The declaration is resolved once, at registration: the
//! source field definitions are copied onto the destination as
//! `{prefix}_{field}` and a link table records where each came from. At
//! validation time a pre-validator copies values from sibling records of the
//! source models into the destination record, never overriding values the
//! caller supplied, before the input is checked with `jsonschema`.
//!
//! ```
//! use linkfield_core::{FieldDef, ModelType, model_ref};
//! use linkfield_schema::{LinkDeclaration, ModelRegistry};
//! use serde_json::json;
//!
//! let mut registry = ModelRegistry::new();
//! registry.register(
//!     ModelType::new("Foo")
//!         .field("a", FieldDef::required(json!({ "type": "integer" })))
//!         .field("b", FieldDef::required(json!({ "type": "string" }))),
//! )?;
//! registry.register_linked(
//!     ModelType::new("Bar").field("c", FieldDef::required(json!({ "type": "number" }))),
//!     &LinkDeclaration::new().link("f", "Foo"),
//! )?;
//! registry.register_linked(
//!     ModelType::new("AppConfig")
//!         .field("foo", FieldDef::required(model_ref("Foo")))
//!         .field("bar", FieldDef::required(model_ref("Bar"))),
//!     &LinkDeclaration::new(),
//! )?;
//!
//! let config = registry.validate(
//!     "AppConfig",
//!     json!({ "foo": { "a": 1, "b": "test" }, "bar": { "c": 2.5 } }),
//! )?;
//! let bar = config.nested("bar", "Bar")?;
//! assert_eq!(bar.get("f_a"), Some(&json!(1)));
//! assert_eq!(bar.get("f_b"), Some(&json!("test")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! Model, field, and raw input types live in `linkfield-core`. Settings
//! (name separator, strictness, unknown-field handling) come from
//! `linkfield-config`. This crate holds the registry, the annotation
//! search, field synthesis, link resolution, and the validation pipeline.

pub mod declaration;
pub mod error;
pub mod extract;
pub mod import;
pub mod link_table;
pub mod registry;
pub mod resolve;
pub mod synth;
mod validate;
mod walk;

pub use declaration::{LinkDeclaration, LinkSpec};
pub use error::{ErrorKind, FieldError, SchemaError, ValidationErrors};
pub use extract::model_type_of;
pub use import::model_from_json_schema;
pub use link_table::{LinkEntry, LinkTable};
pub use registry::{ModelEntry, ModelRegistry, PreValidator};
pub use resolve::{resolve_links, source_mapping};
pub use synth::synthesize_links;
