//! Link declarations: which source model fields a destination mirrors.

use serde_json::Value;

/// What a single prefix links to.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkSpec {
    /// Every field of the named model.
    Model(String),
    /// Only the listed fields of the named model.
    Fields { model: String, fields: Vec<String> },
    /// An entry that is neither of the above; kept so the synthesizer can
    /// skip or reject it.
    Malformed(Value),
}

/// Ordered mapping of name prefix to [`LinkSpec`], fixed at registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkDeclaration {
    entries: Vec<(String, LinkSpec)>,
}

impl LinkDeclaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link all fields of `model` under `prefix`.
    #[must_use]
    pub fn link(self, prefix: impl Into<String>, model: impl Into<String>) -> Self {
        self.with(prefix, LinkSpec::Model(model.into()))
    }

    /// Link the listed fields of `model` under `prefix`.
    #[must_use]
    pub fn link_fields<I, S>(self, prefix: impl Into<String>, model: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(
            prefix,
            LinkSpec::Fields {
                model: model.into(),
                fields: fields.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Add a raw entry. A later entry with the same prefix replaces the
    /// earlier one in place.
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, spec: LinkSpec) -> Self {
        let prefix = prefix.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((prefix, spec)),
        }
        self
    }

    /// Read a declaration written as data, e.g. from JSON or TOML:
    ///
    /// ```json
    /// { "f": "Foo", "g": ["Foo", "a", "b"] }
    /// ```
    ///
    /// A string links a whole model. An array whose first item is a string
    /// links a subset; non-string items after the model name are dropped.
    /// Any other entry is kept as [`LinkSpec::Malformed`]. A value that is
    /// not an object yields an empty declaration.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        map.iter().fold(Self::default(), |decl, (prefix, entry)| {
            decl.with(prefix.clone(), LinkSpec::from_value(entry))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkSpec)> {
        self.entries.iter().map(|(p, s)| (p.as_str(), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LinkSpec {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(model) => Self::Model(model.clone()),
            Value::Array(items) => match items.split_first() {
                Some((Value::String(model), rest)) => Self::Fields {
                    model: model.clone(),
                    fields: rest
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                },
                _ => Self::Malformed(value.clone()),
            },
            other => Self::Malformed(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn builder_keeps_order() {
        let decl = LinkDeclaration::new()
            .link("f", "Foo")
            .link_fields("g", "Foo", ["a"]);
        let prefixes: Vec<&str> = decl.iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["f", "g"]);
        assert_eq!(
            decl.iter().nth(1).map(|(_, s)| s.clone()),
            Some(LinkSpec::Fields {
                model: "Foo".into(),
                fields: vec!["a".into()],
            })
        );
    }

    #[test]
    fn repeated_prefix_replaces_entry() {
        let decl = LinkDeclaration::new().link("f", "Foo").link("f", "Bar");
        assert_eq!(decl.len(), 1);
        assert_eq!(
            decl.iter().next().map(|(_, s)| s.clone()),
            Some(LinkSpec::Model("Bar".into()))
        );
    }

    #[test]
    fn parses_data_form() {
        let decl = LinkDeclaration::from_value(&json!({
            "f": "Foo",
            "g": ["Foo", "a", 3, "b"],
            "h": 42,
            "i": [],
            "j": [1, "a"]
        }));
        let specs: Vec<LinkSpec> = decl.iter().map(|(_, s)| s.clone()).collect();
        assert_eq!(
            specs,
            vec![
                LinkSpec::Model("Foo".into()),
                LinkSpec::Fields {
                    model: "Foo".into(),
                    fields: vec!["a".into(), "b".into()],
                },
                LinkSpec::Malformed(json!(42)),
                LinkSpec::Malformed(json!([])),
                LinkSpec::Malformed(json!([1, "a"])),
            ]
        );
    }

    #[test]
    fn non_object_is_empty() {
        assert!(LinkDeclaration::from_value(&json!("Foo")).is_empty());
        assert!(LinkDeclaration::from_value(&Value::Null).is_empty());
    }
}
