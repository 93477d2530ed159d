//! Configuration types for fsel.
//!
//! [`Config::load`] reads `~/.config/fsel/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] layers
//! an explicit file over the defaults. [`Config::defaults`] returns the same
//! defaults without touching the filesystem (useful in tests).

use crate::error::ConfigError;
use crate::search::QuerySettings;
use crate::types::{FilterCondition, ResourceKind, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:3000"

[selector]
filter_name  = "assignee"
resource     = "users"
value_kind   = "resource"
search_field = "name"
debounce_ms  = 250
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/fsel/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
}

/// `[api]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `pageSize` when set.
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn default_base_url() -> String { "http://localhost:3000".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: None,
        }
    }
}

/// `[selector]` section of `config.toml`.
///
/// ```toml
/// [selector]
/// resource     = "work_packages"
/// search_field = "subjectOrId"
///
/// [[selector.conditions]]
/// field    = "status"
/// operator = "o"
/// values   = []
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_filter_name")]
    pub filter_name: String,
    #[serde(default = "default_resource")]
    pub resource: ResourceKind,
    #[serde(default)]
    pub value_kind: ValueKind,
    /// Free-text search field. Absent or blank disables free-text search.
    #[serde(default)]
    pub search_field: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

fn default_filter_name() -> String { "assignee".to_string() }
fn default_resource() -> ResourceKind { ResourceKind::Users }
fn default_debounce_ms() -> u64 { 250 }

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            filter_name: default_filter_name(),
            resource: default_resource(),
            value_kind: ValueKind::default(),
            search_field: Some("name".to_string()),
            debounce_ms: default_debounce_ms(),
            conditions: Vec::new(),
        }
    }
}

impl SelectorConfig {
    /// Controller settings for this selector.
    pub fn query_settings(&self) -> QuerySettings {
        QuerySettings {
            resource: self.resource,
            conditions: self.conditions.clone(),
            search_field: self
                .search_field
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/fsel/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Layer `path` over the built-in defaults. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.page_size == Some(0) {
            return Err(ConfigError::Invalid {
                key: "api.page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "api.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("fsel")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
