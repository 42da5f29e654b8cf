//! Walk a JSON value alongside its annotation and rewrite every nested
//! model record it contains.

use linkfield_core::ref_target;
use serde_json::Value;

use crate::extract::UNION_KEYS;
use crate::registry::ModelRegistry;

/// Apply `visit` to each record in `value` that the annotation types as a
/// registered model, following unions, list and tuple items, and dictionary
/// values. Values whose shape does not match the annotation are returned
/// untouched.
///
/// For unions, a member is a candidate when it holds a model, fits the
/// value's shape (object or array), and accepts the value either before or
/// after visiting. Among candidates the one whose model declares the most
/// of the value's keys wins; ties go to the earlier member. With no
/// candidate the value is left untouched.
pub(crate) fn map_models(
    registry: &ModelRegistry,
    annotation: &Value,
    value: Value,
    visit: &mut dyn FnMut(&str, Value) -> Value,
) -> Value {
    if let Some(name) = ref_target(annotation) {
        return if registry.contains(name) && value.is_object() {
            visit(name, value)
        } else {
            value
        };
    }

    for key in UNION_KEYS {
        if let Some(members) = annotation.get(key).and_then(Value::as_array) {
            return map_union(registry, members, value, visit);
        }
    }

    match value {
        Value::Array(items) => {
            let positional = annotation
                .get("prefixItems")
                .or_else(|| annotation.get("items").filter(|i| i.is_array()))
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            let trailing = annotation.get("items").filter(|i| i.is_object());

            let mut mapped = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                mapped.push(match positional.get(i).or(trailing) {
                    Some(schema) => map_models(registry, schema, item, visit),
                    None => item,
                });
            }
            Value::Array(mapped)
        }
        Value::Object(map) => match annotation.get("additionalProperties") {
            Some(schema @ Value::Object(_)) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| {
                        let v = map_models(registry, schema, v, visit);
                        (k, v)
                    })
                    .collect(),
            ),
            _ => Value::Object(map),
        },
        other => other,
    }
}

fn map_union(
    registry: &ModelRegistry,
    members: &[Value],
    value: Value,
    visit: &mut dyn FnMut(&str, Value) -> Value,
) -> Value {
    let mut best: Option<(usize, Value)> = None;
    for member in members.iter().filter(|m| fits(registry, m, &value)) {
        let mapped = map_models(registry, member, value.clone(), visit);
        if !registry.accepts(member, &value) && !registry.accepts(member, &mapped) {
            continue;
        }
        let score = declared_keys(registry, member, &value);
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, mapped));
        }
    }
    best.map_or(value, |(_, mapped)| mapped)
}

/// How many of the record's keys the member's model declares.
fn declared_keys(registry: &ModelRegistry, member: &Value, value: &Value) -> usize {
    let (Some(model), Some(record)) = (ref_target(member).and_then(|n| registry.get(n)), value.as_object())
    else {
        return 0;
    };
    record.keys().filter(|k| model.has_field(k)).count()
}

/// Whether a union member holds a model and matches the value's shape.
fn fits(registry: &ModelRegistry, member: &Value, value: &Value) -> bool {
    if registry.model_type_of(member).is_none() {
        return false;
    }
    if ref_target(member).is_some() {
        return value.is_object();
    }
    if UNION_KEYS.iter().any(|k| member.get(k).is_some()) {
        return true;
    }
    if member.get("prefixItems").is_some() || member.get("items").is_some() {
        return value.is_array();
    }
    member.get("additionalProperties").is_some() && value.is_object()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfield_core::{FieldDef, ModelType, model_ref};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register(ModelType::new("Foo")).expect("Foo");
        registry
    }

    fn tag(value: Value) -> Value {
        let registry = registry();
        let annotation = value["annotation"].clone();
        map_models(&registry, &annotation, value["value"].clone(), &mut |name: &str, mut v| {
            v["seen"] = json!(name);
            v
        })
    }

    #[test]
    fn visits_direct_and_optional_records() {
        assert_eq!(
            tag(json!({ "annotation": model_ref("Foo"), "value": {} })),
            json!({ "seen": "Foo" })
        );
        assert_eq!(
            tag(json!({
                "annotation": { "anyOf": [model_ref("Foo"), { "type": "null" }] },
                "value": null
            })),
            Value::Null
        );
    }

    #[test]
    fn visits_list_tuple_and_dict_items() {
        assert_eq!(
            tag(json!({
                "annotation": { "type": "array", "items": model_ref("Foo") },
                "value": [{}, 3]
            })),
            json!([{ "seen": "Foo" }, 3])
        );
        assert_eq!(
            tag(json!({
                "annotation": { "type": "array", "prefixItems": [{ "type": "object" }, model_ref("Foo")] },
                "value": [{}, {}]
            })),
            json!([{}, { "seen": "Foo" }])
        );
        assert_eq!(
            tag(json!({
                "annotation": { "type": "object", "additionalProperties": model_ref("Foo") },
                "value": { "x": {}, "y": {} }
            })),
            json!({ "x": { "seen": "Foo" }, "y": { "seen": "Foo" } })
        );
    }

    #[test]
    fn union_follows_member_matching_shape() {
        let annotation = json!({
            "anyOf": [
                { "type": "array", "items": model_ref("Foo") },
                model_ref("Foo")
            ]
        });
        assert_eq!(
            tag(json!({ "annotation": annotation.clone(), "value": {} })),
            json!({ "seen": "Foo" })
        );
        assert_eq!(
            tag(json!({ "annotation": annotation, "value": [{}] })),
            json!([{ "seen": "Foo" }])
        );
    }

    #[test]
    fn unknown_refs_are_not_visited() {
        assert_eq!(
            tag(json!({ "annotation": model_ref("Other"), "value": {} })),
            json!({})
        );
    }

    #[test]
    fn union_prefers_member_declaring_the_record_keys() {
        let mut registry = ModelRegistry::new();
        registry
            .register(ModelType::new("Foo").field(
                "a",
                FieldDef::with_default(json!({ "type": "integer" }), json!(0)),
            ))
            .expect("Foo");
        registry
            .register(ModelType::new("Baz").field("z", FieldDef::required(json!({ "type": "string" }))))
            .expect("Baz");
        let annotation = json!({ "anyOf": [model_ref("Foo"), model_ref("Baz")] });

        let mut visit = |name: &str, mut v: Value| {
            v["seen"] = json!(name);
            v
        };

        let out = map_models(&registry, &annotation, json!({ "z": "keep" }), &mut visit);
        assert_eq!(out, json!({ "z": "keep", "seen": "Baz" }));

        let out = map_models(&registry, &annotation, json!({ "a": 3 }), &mut visit);
        assert_eq!(out, json!({ "a": 3, "seen": "Foo" }));

        let out = map_models(&registry, &annotation, json!({ "z": 1, "a": "x" }), &mut visit);
        assert_eq!(out, json!({ "z": 1, "a": "x" }));
    }
}
