//! Link synthesis configuration.

use serde::{Deserialize, Serialize};

/// Default separator between a link prefix and the source field name.
fn default_separator() -> String {
    "_".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    /// Joins prefix and source field: `{prefix}{separator}{field}`.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Reject malformed link declaration entries instead of skipping them.
    #[serde(default)]
    pub strict_declarations: bool,

    /// Reject synthesized fields whose name is already declared on the model.
    /// When off, the synthesized definition replaces the declared one.
    #[serde(default)]
    pub reject_collisions: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            strict_declarations: false,
            reject_collisions: false,
        }
    }
}

impl LinkConfig {
    /// Name of the field synthesized for `field` under `prefix`.
    #[must_use]
    pub fn linked_name(&self, prefix: &str, field: &str) -> String {
        format!("{prefix}{}{field}", self.separator)
    }
}
