//! Validation pipeline configuration.

use serde::{Deserialize, Serialize};

const fn default_strip_unknown_fields() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Drop keys a model does not declare when building an instance.
    #[serde(default = "default_strip_unknown_fields")]
    pub strip_unknown_fields: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strip_unknown_fields: default_strip_unknown_fields(),
        }
    }
}
