//! Renderer configuration management for `trellis.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[sources]` | Data source preference, remote endpoint, paths   |
//! | `[render]`  | Build mode, reserved debug-route prefix          |
//! | `[extra]`   | User-defined custom fields (ignored by the core) |
//!
//! Environment variables override file values, mirroring how the hosting
//! environment injects deployment-specific settings:
//!
//! | Variable                | Overrides                 |
//! |-------------------------|---------------------------|
//! | `TRELLIS_DATA_SOURCE`   | `sources.preference`      |
//! | `TRELLIS_REMOTE_DOMAIN` | `sources.remote_domain`   |
//! | `TRELLIS_REMOTE_PATH`   | `sources.remote_path`     |
//! | `TRELLIS_ENV`           | `render.mode`             |

pub mod defaults;
mod error;
mod render;
mod sources;

pub use error::ConfigError;
pub use render::{BuildMode, RenderConfig};
pub use sources::{SourcePreference, SourcesConfig};

use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing trellis.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Data source settings
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl RendererConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: RendererConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Apply environment variable overrides on top of file values.
    pub fn update_with_env(&mut self) {
        self.update_with_vars(|key| std::env::var(key).ok());
    }

    /// Like [`update_with_env`](Self::update_with_env), with an injectable
    /// lookup so tests never touch the process environment.
    pub fn update_with_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TRELLIS_DATA_SOURCE") {
            self.sources.preference = value;
        }
        if let Some(value) = lookup("TRELLIS_REMOTE_DOMAIN") {
            self.sources.remote_domain = Some(value);
        }
        if let Some(value) = lookup("TRELLIS_REMOTE_PATH") {
            self.sources.remote_path = value;
        }
        if let Some(value) = lookup("TRELLIS_ENV") {
            self.render.mode = value;
        }
    }

    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sources.remote_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "sources.remote_path must be a relative object key prefix".to_string(),
            )
            .into());
        }
        if !self.render.debug_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "render.debug_prefix must start with '/'".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_roundtrip() {
        let raw = r#"
            [sources]
            preference = "local"
            remote_domain = "cdn.example.net"

            [render]
            mode = "production"

            [extra]
            analytics_id = "UA-12345"
        "#;
        let config = RendererConfig::from_str(raw).unwrap();
        assert_eq!(
            config.sources.preference(),
            SourcePreference::Named("local".into())
        );
        assert!(config.render.mode().is_production());
        assert!(config.extra.contains_key("analytics_id"));
    }

    #[test]
    fn test_unknown_field_rejection() {
        let raw = r#"
            [sources]
            preferrence = "auto"
        "#;
        assert!(RendererConfig::from_str(raw).is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = RendererConfig::default();
        config.update_with_vars(|key| match key {
            "TRELLIS_DATA_SOURCE" => Some("remote".into()),
            "TRELLIS_REMOTE_DOMAIN" => Some("edge.example.org".into()),
            "TRELLIS_ENV" => Some("production".into()),
            _ => None,
        });

        assert_eq!(
            config.sources.preference(),
            SourcePreference::Named("remote".into())
        );
        assert_eq!(config.sources.remote_domain.as_deref(), Some("edge.example.org"));
        assert!(config.render.mode().is_production());
    }

    #[test]
    fn test_validate_rejects_absolute_remote_path() {
        let mut config = RendererConfig::default();
        config.sources.remote_path = "/database/json".into();
        assert!(config.validate().is_err());

        config.sources.remote_path = "database/json".into();
        assert!(config.validate().is_ok());
    }
}
