//! Central model registry.
//!
//! The `ModelRegistry` is the explicit stand-in for a class registry: every
//! model is registered once, linked models get their fields synthesized and
//! their link table stored here, and validation looks models, link tables,
//! and pre-validators up by name.

use std::fmt;

use indexmap::IndexMap;
use linkfield_config::LinkfieldConfig;
use linkfield_core::{ModelType, RawInput};
use schemars::JsonSchema;
use serde_json::{Map, Value, json};

use crate::declaration::LinkDeclaration;
use crate::error::SchemaError;
use crate::extract;
use crate::import::{model_from_json_schema, resolve_root_refs};
use crate::link_table::LinkTable;
use crate::resolve::resolve_links;
use crate::synth::synthesize_links;

pub(crate) const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// A step run on raw input before schema validation. Receives the registry,
/// the model being validated, and the raw input; returns the rewritten input.
pub type PreValidator = fn(&ModelRegistry, &ModelType, RawInput) -> RawInput;

/// Everything the registry knows about one model.
#[derive(Clone)]
pub struct ModelEntry {
    model: ModelType,
    /// Present only for models registered with link synthesis.
    links: Option<LinkTable>,
    pre_validators: Vec<PreValidator>,
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("model", &self.model)
            .field("links", &self.links)
            .field("pre_validators", &self.pre_validators.len())
            .finish()
    }
}

impl ModelEntry {
    #[must_use]
    pub const fn model(&self) -> &ModelType {
        &self.model
    }

    #[must_use]
    pub const fn links(&self) -> Option<&LinkTable> {
        self.links.as_ref()
    }

    #[must_use]
    pub fn pre_validators(&self) -> &[PreValidator] {
        &self.pre_validators
    }
}

/// Store of all models, auxiliary schema definitions, and link tables.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: IndexMap<String, ModelEntry>,
    /// Non-model `$defs` (enums, aliases) that model annotations refer to.
    definitions: IndexMap<String, Value>,
    config: LinkfieldConfig,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: LinkfieldConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LinkfieldConfig {
        &self.config
    }

    /// Register a plain model: no synthesized fields, no pre-validators.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if the name is taken.
    pub fn register(&mut self, model: ModelType) -> Result<(), SchemaError> {
        self.insert(ModelEntry {
            model,
            links: None,
            pre_validators: Vec::new(),
        })
    }

    /// Register a model that takes part in linking.
    ///
    /// Synthesizes the fields named by `declaration`, stores the resulting
    /// link table, and installs the link resolver as the model's first
    /// pre-validator. An empty declaration still opts the model in, so its
    /// own model-typed fields are resolved at validation.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if the name is taken, or any error
    /// from [`synthesize_links`]. Nothing is registered on error.
    pub fn register_linked(
        &mut self,
        mut model: ModelType,
        declaration: &LinkDeclaration,
    ) -> Result<(), SchemaError> {
        if self.entries.contains_key(model.name()) {
            return Err(SchemaError::Duplicate(model.name().to_string()));
        }

        let mut table = LinkTable::new();
        let name = model.name().to_string();
        synthesize_links(
            self,
            &name,
            declaration,
            &mut table,
            model.fields_mut(),
            &self.config.links,
        )?;

        self.insert(ModelEntry {
            model,
            links: Some(table),
            pre_validators: vec![resolve_links as PreValidator],
        })
    }

    /// Register `T` and every object definition it references, generating
    /// the schema with `schemars`. Definitions already registered are kept.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if `T` is already registered, or
    /// `SchemaError::InvalidModelSchema` if `T` is not an object schema.
    pub fn register_schema<T: JsonSchema>(&mut self) -> Result<(), SchemaError> {
        let model = self.import_schema::<T>()?;
        self.register(model)
    }

    /// Like [`ModelRegistry::register_schema`], with link synthesis.
    ///
    /// # Errors
    ///
    /// Same as [`ModelRegistry::register_schema`] and
    /// [`ModelRegistry::register_linked`].
    pub fn register_linked_schema<T: JsonSchema>(
        &mut self,
        declaration: &LinkDeclaration,
    ) -> Result<(), SchemaError> {
        let model = self.import_schema::<T>()?;
        self.register_linked(model, declaration)
    }

    /// Register a non-model definition referenced from annotations as
    /// `#/$defs/<name>`. Replaces an existing definition of the same name.
    pub fn register_definition(&mut self, name: impl Into<String>, schema: Value) {
        self.definitions.insert(name.into(), schema);
    }

    /// Append a pre-validator to a registered model. Pre-validators run in
    /// the order they were added; for linked models the link resolver is first.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the model is not registered.
    pub fn add_pre_validator(&mut self, model: &str, step: PreValidator) -> Result<(), SchemaError> {
        let entry = self
            .entries
            .get_mut(model)
            .ok_or_else(|| SchemaError::NotFound(model.to_string()))?;
        entry.pre_validators.push(step);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelType> {
        self.entries.get(name).map(ModelEntry::model)
    }

    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Link table of a linked model. `None` for plain or unknown models.
    #[must_use]
    pub fn link_table(&self, name: &str) -> Option<&LinkTable> {
        self.entries.get(name).and_then(ModelEntry::links)
    }

    /// Model named by a field annotation, if it names a registered model.
    #[must_use]
    pub fn model_type_of<'a>(&self, annotation: &'a Value) -> Option<&'a str> {
        extract::model_type_of(annotation, &|name| self.contains(name))
    }

    /// Registered model names, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.entries.len()
    }

    /// Standalone JSON Schema document for `name`, with every registered
    /// model and definition under `$defs`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the model is not registered.
    pub fn json_schema(&self, name: &str) -> Result<Value, SchemaError> {
        if !self.contains(name) {
            return Err(SchemaError::NotFound(name.to_string()));
        }

        Ok(json!({
            "$schema": SCHEMA_DIALECT,
            "$ref": format!("#/$defs/{name}"),
            "$defs": self.defs(),
        }))
    }

    /// Every registered definition and model schema, keyed for `$defs`.
    pub(crate) fn defs(&self) -> Map<String, Value> {
        let mut defs = Map::new();
        for (def_name, schema) in &self.definitions {
            defs.insert(def_name.clone(), schema.clone());
        }
        for (model_name, entry) in &self.entries {
            defs.insert(model_name.clone(), entry.model.to_json_schema());
        }
        defs
    }

    fn insert(&mut self, entry: ModelEntry) -> Result<(), SchemaError> {
        let name = entry.model.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(SchemaError::Duplicate(name));
        }
        tracing::debug!(
            model = %name,
            fields = entry.model.fields().len(),
            linked = entry.links.is_some(),
            "registered model"
        );
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Generate `T`'s schema and register its `$defs` dependencies.
    fn import_schema<T: JsonSchema>(&mut self) -> Result<ModelType, SchemaError> {
        let name = T::schema_name().into_owned();
        let mut schema = serde_json::to_value(schemars::schema_for!(T))
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;
        resolve_root_refs(&mut schema, &name);

        if let Some(defs) = schema.get("$defs").and_then(Value::as_object) {
            for (def_name, def) in defs {
                if self.contains(def_name) || self.definitions.contains_key(def_name) {
                    continue;
                }
                if def.get("properties").is_some() {
                    let dependency = model_from_json_schema(def_name, def)?;
                    self.register(dependency)?;
                } else {
                    self.register_definition(def_name.clone(), def.clone());
                }
            }
        }

        model_from_json_schema(&name, &schema)
    }
}
