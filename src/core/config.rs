use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the settings file in every configuration layer.
pub const SETTINGS_FILE: &str = "babel.toml";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How the command-line tool prints books and metadata.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pages and lines as plain text
    #[default]
    Text,
    /// The worker response as JSON
    Json,
}

/// Defaults for `search`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SearchSettings {
    /// Pages of random padding around the search text; 0 for the bare text
    pub pages: usize,
}

/// Defaults for `random`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RandomSettings {
    pub pages: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub page_headers: bool,
}

/// Effective settings after merging every configuration layer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    pub search: SearchSettings,
    pub random: RandomSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Parses a complete settings document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the built-in settings bundled with the library.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_toml(include_str!("../../babel.toml"))
    }

    /// Loads settings with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in settings (from library)
    /// 2. `~/.config/babel-books/babel.toml` (user overrides)
    /// 3. `./babel.toml` (project-local overrides)
    ///
    /// Later files override earlier ones key by key. A file that cannot be
    /// read or parsed is skipped with a warning.
    pub fn load_with_overrides() -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            layers.push(config_dir.join("babel-books").join(SETTINGS_FILE));
        }
        layers.push(PathBuf::from(SETTINGS_FILE));
        Self::load_layers(&layers)
    }

    /// Merges each existing file in `paths`, in order, over the built-in settings.
    pub fn load_layers(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged: toml::Table = toml::from_str(include_str!("../../babel.toml"))?;

        for path in paths {
            if !path.exists() {
                continue;
            }
            match read_table(path) {
                Ok(overlay) => {
                    debug!(?path, "applying settings overrides");
                    let mut candidate = merged.clone();
                    merge_tables(&mut candidate, overlay);
                    // Reject a layer that leaves the settings unusable
                    match toml::Value::Table(candidate.clone()).try_into::<Settings>() {
                        Ok(_) => merged = candidate,
                        Err(e) => warn!(?path, error = %e, "ignoring invalid settings file"),
                    }
                }
                Err(e) => warn!(?path, error = %e, "failed to load settings file"),
            }
        }

        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Renders the settings as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Recursively overlays `overlay` onto `base`; scalar values replace, tables merge.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}
