//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nodegraph/nodegraph.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `NODEGRAPH_*` prefix, `__` between sections
//!    (e.g. `NODEGRAPH_OUTPUT__PRETTY=false`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::tree_traits::RenderOptions;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("config file not found: {0}")]
    Missing(PathBuf),

    #[error("cannot render settings: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// JSON output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Indent emitted documents (default: true)
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Tree outline settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    pub show_tags: bool,
    pub show_data: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_tags: true,
            show_data: true,
        }
    }
}

impl From<&RenderSettings> for RenderOptions {
    fn from(s: &RenderSettings) -> Self {
        Self {
            show_tags: s.show_tags,
            show_data: s.show_data,
        }
    }
}

/// Tag search settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Search the whole subtree instead of immediate children
    pub deep: bool,
}

/// Unified configuration for nodegraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub render: RenderSettings,
    pub search: SearchSettings,
}

/// Get the XDG config directory for nodegraph.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nodegraph").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nodegraph.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `explicit` must exist when given; the global file is optional.
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Same as [`Settings::load`] with the global file location supplied.
    pub fn load_from(global: Option<&Path>, explicit: Option<&Path>) -> SettingsResult<Self> {
        let defaults = toml::to_string(&Settings::default())?;
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "global config");
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(SettingsError::Missing(path.to_path_buf()));
            }
            debug!(path = %path.display(), "explicit config");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("NODEGRAPH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.render)
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = Settings::default().to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn render_options_follow_settings() {
        let mut settings = Settings::default();
        settings.render.show_data = false;
        let options = settings.render_options();
        assert!(options.show_tags);
        assert!(!options.show_data);
    }
}
