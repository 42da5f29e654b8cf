//! Models imported from `schemars`-derived Rust types.

#![allow(dead_code)]

use linkfield_core::model_ref;
use linkfield_schema::{ErrorKind, LinkDeclaration, ModelRegistry, SchemaError};
use pretty_assertions::assert_eq;
use schemars::JsonSchema;
use serde_json::json;

#[derive(JsonSchema)]
struct Foo {
    a: i64,
    b: String,
}

#[derive(JsonSchema)]
struct Bar {
    c: f64,
}

#[derive(JsonSchema)]
struct AppConfig {
    foo: Option<Foo>,
    bar: Bar,
}

fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register_schema::<Foo>().expect("Foo");
    registry
        .register_linked_schema::<Bar>(&LinkDeclaration::new().link("f", "Foo"))
        .expect("Bar");
    registry
        .register_linked_schema::<AppConfig>(&LinkDeclaration::new())
        .expect("AppConfig");
    registry
}

#[test]
fn derived_dependencies_are_not_registered_twice() {
    let registry = registry();
    assert_eq!(registry.list(), vec!["Foo", "Bar", "AppConfig"]);

    let bar = registry.get("Bar").expect("Bar");
    assert_eq!(
        bar.get("f_a").map(|d| d.schema["type"].clone()),
        Some(json!("integer"))
    );
    assert_eq!(
        bar.get("f_b").map(|d| d.schema["type"].clone()),
        Some(json!("string"))
    );
}

#[test]
fn derived_models_resolve_links() {
    let registry = registry();
    let config = registry
        .validate(
            "AppConfig",
            json!({ "foo": { "a": 1, "b": "test" }, "bar": { "c": 2.5 } }),
        )
        .expect("valid");
    let bar = config.nested("bar", "Bar").expect("bar");
    assert_eq!(bar.get("f_a"), Some(&json!(1)));
    assert_eq!(bar.get("f_b"), Some(&json!("test")));
}

#[test]
fn optional_derived_source_may_be_absent() {
    let registry = registry();
    let Err(SchemaError::Validation(errors)) =
        registry.validate("AppConfig", json!({ "bar": { "c": 2.5 } }))
    else {
        panic!("expected validation errors");
    };
    let mut paths = errors.paths();
    paths.sort();
    assert_eq!(paths, vec!["bar.f_a", "bar.f_b"]);
    assert_eq!(errors.of_kind(ErrorKind::Missing).count(), 2);
}

#[derive(JsonSchema)]
struct Node {
    name: String,
    children: Vec<Node>,
}

#[test]
fn recursive_children_are_shaped_like_the_root() {
    let mut registry = ModelRegistry::new();
    registry
        .register_linked_schema::<Node>(&LinkDeclaration::new())
        .expect("Node");

    let node = registry.get("Node").expect("Node");
    assert_eq!(
        node.get("children").map(|d| d.schema["items"].clone()),
        Some(model_ref("Node"))
    );

    let tree = registry
        .validate(
            "Node",
            json!({
                "name": "root",
                "junk": 1,
                "children": [{ "name": "c", "children": [], "junk": 2 }]
            }),
        )
        .expect("valid");
    assert_eq!(
        tree.into_value(),
        json!({ "name": "root", "children": [{ "name": "c", "children": [] }] })
    );
}
