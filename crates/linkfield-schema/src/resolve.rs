//! Link resolution: fill linked fields from sibling values before validation.
//!
//! Given the raw record for a linked model, every field whose annotation
//! names a model becomes a potential source. For each such field whose model
//! is itself a link destination, the destination's raw object receives the
//! linked values read from the matching sibling, but only for keys the
//! caller did not supply. Nothing here fails: absent or oddly shaped values
//! are left for schema validation to report.

use indexmap::IndexMap;
use linkfield_core::{ModelType, RawInput, RawRecord, RawValue};
use serde_json::Value;

use crate::link_table::LinkTable;
use crate::registry::ModelRegistry;

/// Pre-validator installed on every linked model.
pub fn resolve_links(registry: &ModelRegistry, model: &ModelType, input: RawInput) -> RawInput {
    let mut record = match input {
        RawInput::Record(record) => record,
        other => return other,
    };

    let sources = source_mapping(registry, model);
    for (dest_model, dest_field) in &sources {
        let Some(links) = registry.link_table(dest_model) else {
            continue;
        };

        let copies = pending_copies(&record, &sources, links, dest_field);
        if copies.is_empty() {
            continue;
        }
        if let Some(dest) = record.get_mut(dest_field).and_then(RawValue::as_object_mut) {
            for (key, value) in copies {
                tracing::trace!(model = model.name(), field = %dest_field, key = %key, "copied linked value");
                dest.insert(key, value);
            }
        }
    }

    RawInput::Record(record)
}

/// Model name -> name of the declared field holding that model.
///
/// Synthesized fields are not sources. When two fields hold the same model
/// the later field wins.
pub fn source_mapping(registry: &ModelRegistry, model: &ModelType) -> IndexMap<String, String> {
    let mut sources = IndexMap::new();
    for (field, def) in model.declared_fields() {
        if let Some(source_model) = registry.model_type_of(&def.schema) {
            if let Some(previous) = sources.insert(source_model.to_string(), field.to_string()) {
                tracing::debug!(
                    model = model.name(),
                    source = source_model,
                    previous = %previous,
                    field,
                    "later field replaces earlier source for the same model"
                );
            }
        }
    }
    sources
}

/// Values to write into the destination object at `dest_field`.
fn pending_copies(
    record: &RawRecord,
    sources: &IndexMap<String, String>,
    links: &LinkTable,
    dest_field: &str,
) -> Vec<(String, Value)> {
    let Some(dest) = record.get(dest_field).and_then(RawValue::as_object) else {
        return Vec::new();
    };

    let mut copies: Vec<(String, Value)> = Vec::new();
    for (source_model, source_field) in sources {
        let Some(source) = record.get(source_field).and_then(RawValue::as_field_source) else {
            continue;
        };

        for entry in links.for_source(source_model) {
            for (dest_key, source_key) in entry.fields() {
                if dest.contains_key(dest_key) || copies.iter().any(|(k, _)| k == dest_key) {
                    continue;
                }
                if !source.has_field(source_key) {
                    continue;
                }
                if let Some(value) = source.get_field(source_key) {
                    copies.push((dest_key.clone(), value.clone()));
                }
            }
        }
    }
    copies
}
