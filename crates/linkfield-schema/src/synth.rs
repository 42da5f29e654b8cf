//! Field synthesis: turn a link declaration into concrete fields.
//!
//! Runs once, when a linked model is registered. For every declaration
//! entry the referenced source fields are deep-copied onto the destination
//! under `{prefix}{separator}{field}` and the name pairs are recorded in the
//! destination's [`LinkTable`].

use indexmap::IndexMap;
use linkfield_config::LinkConfig;
use linkfield_core::{FieldDef, FieldOrigin, ModelType};

use crate::declaration::{LinkDeclaration, LinkSpec};
use crate::error::SchemaError;
use crate::link_table::{LinkEntry, LinkTable};
use crate::registry::ModelRegistry;

/// Add the fields described by `declaration` to `fields` and append one
/// link entry per source to `table`.
///
/// # Errors
///
/// - `SchemaError::UnknownModel` if an entry names an unregistered model
/// - `SchemaError::UnknownField` if a subset names a field the source lacks
/// - `SchemaError::MalformedLink` for malformed entries when
///   `strict_declarations` is set (otherwise they are skipped)
/// - `SchemaError::FieldCollision` when a synthesized name is taken and
///   `reject_collisions` is set (otherwise the new definition replaces it)
pub fn synthesize_links(
    registry: &ModelRegistry,
    model_name: &str,
    declaration: &LinkDeclaration,
    table: &mut LinkTable,
    fields: &mut IndexMap<String, FieldDef>,
    config: &LinkConfig,
) -> Result<(), SchemaError> {
    for (prefix, spec) in declaration.iter() {
        let Some((source, names)) = resolve_spec(registry, prefix, spec, config)? else {
            continue;
        };

        let mut mapping = IndexMap::new();
        for field in names {
            let def = source.get(field).ok_or_else(|| SchemaError::UnknownField {
                model: source.name().to_string(),
                field: field.to_string(),
            })?;

            let key = config.linked_name(prefix, field);
            if fields.contains_key(&key) {
                if config.reject_collisions {
                    return Err(SchemaError::FieldCollision {
                        model: model_name.to_string(),
                        field: key,
                    });
                }
                tracing::warn!(model = model_name, field = %key, source = source.name(), "linked field replaces an existing definition");
            }

            let mut linked = def.clone();
            linked.origin = FieldOrigin::Linked {
                model: source.name().to_string(),
                field: field.to_string(),
            };
            fields.insert(key.clone(), linked);
            mapping.insert(key, field.to_string());
        }

        if mapping.is_empty() {
            tracing::debug!(model = model_name, prefix, "link entry produced no fields");
        } else {
            tracing::debug!(model = model_name, prefix, source = source.name(), count = mapping.len(), "synthesized linked fields");
            table.push(LinkEntry::new(source.name(), mapping));
        }
    }
    Ok(())
}

/// Source model and the field names to link, or `None` for a skipped entry.
fn resolve_spec<'r, 's>(
    registry: &'r ModelRegistry,
    prefix: &str,
    spec: &'s LinkSpec,
    config: &LinkConfig,
) -> Result<Option<(&'r ModelType, Vec<&'r str>)>, SchemaError>
where
    's: 'r,
{
    let lookup = |model: &str| {
        registry.get(model).ok_or_else(|| SchemaError::UnknownModel {
            prefix: prefix.to_string(),
            model: model.to_string(),
        })
    };

    match spec {
        LinkSpec::Model(model) => {
            let source = lookup(model)?;
            let names = source.fields().keys().map(String::as_str).collect();
            Ok(Some((source, names)))
        }
        LinkSpec::Fields { model, fields } => {
            let source = lookup(model)?;
            Ok(Some((source, fields.iter().map(String::as_str).collect())))
        }
        LinkSpec::Malformed(value) => {
            if config.strict_declarations {
                return Err(SchemaError::MalformedLink {
                    prefix: prefix.to_string(),
                    value: value.to_string(),
                });
            }
            tracing::debug!(prefix, %value, "skipping malformed link declaration");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfield_config::LinkfieldConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry_with_foo(config: LinkfieldConfig) -> ModelRegistry {
        let mut registry = ModelRegistry::with_config(config);
        registry
            .register(
                ModelType::new("Foo")
                    .field("a", FieldDef::required(json!({ "type": "integer", "minimum": 0 })))
                    .field("b", FieldDef::required(json!({ "type": "string" }))),
            )
            .expect("register Foo");
        registry
    }

    fn bar_model() -> ModelType {
        ModelType::new("Bar").field("c", FieldDef::required(json!({ "type": "number" })))
    }

    fn field_names(registry: &ModelRegistry, model: &str) -> Vec<String> {
        registry
            .get(model)
            .map(|m| m.fields().keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn whole_model_links_every_field() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        registry
            .register_linked(bar_model(), &LinkDeclaration::new().link("f", "Foo"))
            .expect("register Bar");

        assert_eq!(field_names(&registry, "Bar"), vec!["c", "f_a", "f_b"]);
        let bar = registry.get("Bar").expect("Bar");
        let foo = registry.get("Foo").expect("Foo");
        assert_eq!(bar.get("f_a").map(|d| &d.schema), foo.get("a").map(|d| &d.schema));
        assert_eq!(bar.get("f_b").map(|d| d.schema.clone()), Some(json!({ "type": "string" })));
        assert!(bar.get("f_a").is_some_and(|d| d.required));

        let table = registry.link_table("Bar").expect("linked");
        assert_eq!(table.entries().len(), 1);
        let entry = &table.entries()[0];
        assert_eq!(entry.source(), "Foo");
        assert_eq!(entry.fields().get("f_a").map(String::as_str), Some("a"));
        assert_eq!(entry.fields().get("f_b").map(String::as_str), Some("b"));
    }

    #[test]
    fn subset_links_only_named_fields() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        registry
            .register_linked(bar_model(), &LinkDeclaration::new().link_fields("f", "Foo", ["a"]))
            .expect("register PartialBar");

        let bar = registry.get("Bar").expect("Bar");
        assert!(bar.get("f_a").is_some());
        assert!(bar.get("f_b").is_none());
    }

    #[test]
    fn synthesized_fields_are_independent_copies() {
        let registry = registry_with_foo(LinkfieldConfig::default());
        let mut table = LinkTable::new();
        let mut fields = bar_model().fields().clone();
        synthesize_links(
            &registry,
            "Bar",
            &LinkDeclaration::new().link("f", "Foo"),
            &mut table,
            &mut fields,
            &LinkConfig::default(),
        )
        .expect("synthesize");

        if let Some(def) = fields.get_mut("f_a") {
            def.schema["minimum"] = json!(10);
            def.required = false;
        }
        let source = registry.get("Foo").and_then(|m| m.get("a")).expect("Foo.a");
        assert_eq!(source.schema["minimum"], json!(0));
        assert!(source.required);
        assert_eq!(source.origin, FieldOrigin::Declared);
        assert_eq!(
            fields.get("f_a").map(|d| d.origin.clone()),
            Some(FieldOrigin::Linked {
                model: "Foo".into(),
                field: "a".into()
            })
        );
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn unknown_subset_field_is_fatal() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        let err = registry
            .register_linked(bar_model(), &LinkDeclaration::new().link_fields("f", "Foo", ["zzz"]))
            .expect_err("missing field");
        assert!(matches!(err, SchemaError::UnknownField { ref field, .. } if field == "zzz"));
        assert!(registry.get("Bar").is_none());
    }

    #[test]
    fn unknown_model_is_fatal() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        let err = registry
            .register_linked(bar_model(), &LinkDeclaration::new().link("f", "Nope"))
            .expect_err("missing model");
        assert!(matches!(err, SchemaError::UnknownModel { ref model, .. } if model == "Nope"));
    }

    #[test]
    fn malformed_entries_are_skipped_by_default() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        let decl = LinkDeclaration::from_value(&json!({ "x": 1, "f": "Foo" }));
        registry.register_linked(bar_model(), &decl).expect("permissive");
        assert_eq!(field_names(&registry, "Bar"), vec!["c", "f_a", "f_b"]);
        assert_eq!(registry.link_table("Bar").map(|t| t.entries().len()), Some(1));
    }

    #[test]
    fn malformed_entries_fail_in_strict_mode() {
        let mut config = LinkfieldConfig::default();
        config.links.strict_declarations = true;
        let mut registry = registry_with_foo(config);
        let decl = LinkDeclaration::from_value(&json!({ "x": 1 }));
        let err = registry.register_linked(bar_model(), &decl).expect_err("strict");
        assert!(matches!(err, SchemaError::MalformedLink { ref prefix, .. } if prefix == "x"));
    }

    #[test]
    fn empty_subset_adds_no_table_entry() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        let decl = LinkDeclaration::from_value(&json!({ "f": ["Foo", 1, 2] }));
        registry.register_linked(bar_model(), &decl).expect("register");
        assert_eq!(field_names(&registry, "Bar"), vec!["c"]);
        assert!(registry.link_table("Bar").is_some_and(LinkTable::is_empty));
    }

    #[test]
    fn empty_declaration_is_a_no_op() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        registry
            .register_linked(bar_model(), &LinkDeclaration::new())
            .expect("register");
        assert_eq!(registry.get("Bar"), Some(&bar_model()));
        assert!(registry.link_table("Bar").is_some_and(LinkTable::is_empty));
    }

    #[test]
    fn collision_replaces_declared_field_by_default() {
        let mut registry = registry_with_foo(LinkfieldConfig::default());
        let model = bar_model().field("f_a", FieldDef::required(json!({ "type": "string" })));
        registry
            .register_linked(model, &LinkDeclaration::new().link("f", "Foo"))
            .expect("register");
        assert_eq!(field_names(&registry, "Bar"), vec!["c", "f_a", "f_b"]);
        let bar = registry.get("Bar").expect("Bar");
        assert_eq!(bar.get("f_a").map(|d| d.schema["type"].clone()), Some(json!("integer")));
    }

    #[test]
    fn collision_fails_when_rejected() {
        let mut config = LinkfieldConfig::default();
        config.links.reject_collisions = true;
        let mut registry = registry_with_foo(config);
        let model = bar_model().field("f_a", FieldDef::required(json!({ "type": "string" })));
        let err = registry
            .register_linked(model, &LinkDeclaration::new().link("f", "Foo"))
            .expect_err("collision");
        assert!(matches!(err, SchemaError::FieldCollision { ref field, .. } if field == "f_a"));
    }

    #[test]
    fn custom_separator_names_fields() {
        let mut config = LinkfieldConfig::default();
        config.links.separator = "__".into();
        let mut registry = registry_with_foo(config);
        registry
            .register_linked(bar_model(), &LinkDeclaration::new().link_fields("src", "Foo", ["b"]))
            .expect("register");
        assert_eq!(field_names(&registry, "Bar"), vec!["c", "src__b"]);
    }
}
