//! Find the model type behind a field annotation.
//!
//! Annotations are JSON Schema fragments. Wrappers are unwrapped in a fixed
//! order so the result is deterministic:
//!
//! 1. unions (`anyOf`, then `oneOf`), member by member
//! 2. containers: tuple positions (`prefixItems`), list/set elements
//!    (`items`), dictionary values (`additionalProperties`)
//! 3. the annotation itself, when it is a `$ref` to a known model
//!
//! The first model found wins.

use linkfield_core::ref_target;
use serde_json::Value;

pub(crate) const UNION_KEYS: [&str; 2] = ["anyOf", "oneOf"];

/// Model named by `annotation`, or `None` if no known model appears in it.
///
/// `is_model` decides which `$ref` targets count as models; references to
/// anything else (enums, plain definitions) are ignored.
pub fn model_type_of<'a>(annotation: &'a Value, is_model: &dyn Fn(&str) -> bool) -> Option<&'a str> {
    for key in UNION_KEYS {
        if let Some(members) = annotation.get(key).and_then(Value::as_array) {
            return members.iter().find_map(|m| model_type_of(m, is_model));
        }
    }

    if let Some(args) = container_args(annotation) {
        return args.into_iter().find_map(|arg| model_type_of(arg, is_model));
    }

    ref_target(annotation).filter(|&name| is_model(name))
}

/// Type arguments of a container annotation, in declaration order.
/// `None` when the annotation is not a container.
fn container_args(annotation: &Value) -> Option<Vec<&Value>> {
    let mut args = Vec::new();
    let mut is_container = is_array_type(annotation);

    if let Some(prefix) = annotation.get("prefixItems").and_then(Value::as_array) {
        is_container = true;
        args.extend(prefix);
    }
    match annotation.get("items") {
        Some(Value::Array(positional)) => {
            is_container = true;
            args.extend(positional);
        }
        Some(items @ Value::Object(_)) => {
            is_container = true;
            args.push(items);
        }
        _ => {}
    }
    if let Some(values @ Value::Object(_)) = annotation.get("additionalProperties") {
        is_container = true;
        args.push(values);
    }

    is_container.then_some(args)
}

fn is_array_type(annotation: &Value) -> bool {
    match annotation.get("type") {
        Some(Value::String(t)) => t == "array",
        Some(Value::Array(types)) => types.iter().any(|t| t == "array"),
        _ => false,
    }
}
