//! # linkfield-config
//!
//! Layered configuration loading for linkfield using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LINKFIELD_*` prefix, `__` as separator)
//! 2. Project-level `.linkfield/config.toml`
//! 3. User-level `~/.config/linkfield/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LINKFIELD_LINKS__SEPARATOR` -> `links.separator`,
//! `LINKFIELD_VALIDATION__STRIP_UNKNOWN_FIELDS` -> `validation.strip_unknown_fields`.
//!
//! # Usage
//!
//! ```no_run
//! use linkfield_config::LinkfieldConfig;
//!
//! let config = LinkfieldConfig::load().expect("config");
//! assert_eq!(config.links.linked_name("f", "a"), "f_a");
//! ```

mod error;
mod links;
mod validation;

pub use error::ConfigError;
pub use links::LinkConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkfieldConfig {
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl LinkfieldConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed and
    /// `ConfigError::InvalidValue` if the merged values are unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and check a configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`LinkfieldConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".linkfield/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LINKFIELD_").split("__"))
    }

    /// Reject values that would make link synthesis ambiguous.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `links.separator` is empty.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.links.separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "links.separator".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("linkfield").join("config.toml"))
    }
}
