//! Read-only user configuration loaded from TOML.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calculator::ERROR_MARKER;

const CONFIG_DIR: &str = "keycalc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Text shown on the display when an evaluation fails.
    pub error_marker: String,
    /// Group integer digits with commas on the display. The buffer keeps
    /// the raw number either way.
    pub thousands_separators: bool,
    /// Copy each successful result to the system clipboard.
    pub copy_results: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_marker: ERROR_MARKER.to_string(),
            thousands_separators: false,
            copy_results: false,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/keycalc/config.toml`, if a config dir is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing file at the default location yields the defaults; a
    /// missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => {
                    tracing::debug!("no config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading configuration from {}", path.display()))?;
        let config = Self::parse(&data)
            .with_context(|| format!("parsing configuration {}", path.display()))?;

        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn parse(data: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(data)?)
    }
}
