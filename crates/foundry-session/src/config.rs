//! Session configuration.
//!
//! [`SessionConfig`] names where the store lives on disk, which page and tab
//! own the universe manager (the scope the activity gate checks), the name of
//! the seed universe, the default log filter, and how many changes the
//! session journal keeps. Every field has a default,
//! so an empty YAML document is a valid configuration.
//!
//! ```
//! use foundry_session::config::SessionConfig;
//!
//! let config = SessionConfig::from_yaml_str("storage_path: /tmp/u.yaml\n").unwrap();
//! assert_eq!(config.storage_path.to_str(), Some("/tmp/u.yaml"));
//! assert_eq!(config.page_route, "/research-hub");
//! ```

use std::path::{Path, PathBuf};

use foundry_universe::store::{CollectionStore, DEFAULT_UNIVERSE};
use serde::{Deserialize, Serialize};

use crate::gate::ViewScope;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced while loading a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for this schema.
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds a value the session cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Path of the YAML storage document.
    pub storage_path: PathBuf,
    /// Route of the page that hosts the universe manager.
    pub page_route: String,
    /// Tab, within that page, that hosts the universe manager.
    pub manager_tab: String,
    /// Universe seeded when storage is absent or malformed.
    pub default_universe: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Most recent changes the session journal keeps.
    pub journal_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data/universes.yaml"),
            page_route: "/research-hub".to_owned(),
            manager_tab: "universe-manager-tab".to_owned(),
            default_universe: DEFAULT_UNIVERSE.to_owned(),
            log_filter: "info".to_owned(),
            journal_limit: 256,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Reject values the session cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("page_route", &self.page_route),
            ("manager_tab", &self.manager_tab),
            ("default_universe", &self.default_universe),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_owned(),
                });
            }
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_path",
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }

    /// The page/tab pair the universe manager's views are scoped to.
    pub fn manager_scope(&self) -> ViewScope {
        ViewScope::new(&self.page_route, &self.manager_tab)
    }

    /// The store used when storage has nothing usable.
    pub fn seed_store(&self) -> CollectionStore {
        CollectionStore::from_lists([(self.default_universe.as_str(), Vec::<String>::new())])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
