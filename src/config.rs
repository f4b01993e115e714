//! Converter configuration from `pokedata.yaml`.
//!
//! Every field is optional; the CLI overrides whatever the file sets.
//!
//! ```yaml
//! paths:
//!   data: data
//!   assets: assets
//!   output: dist
//! variants: true
//! ```

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pokedata.yaml";

/// Top-level converter configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    /// Collapse variant rows into their default record
    #[serde(default = "default_true")]
    pub variants: bool,
}

/// Input, asset and output locations
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Folder holding the downloaded sheets
    #[serde(default = "default_data_dir")]
    pub data: PathBuf,

    /// Folder holding `extra/*.json` overrides
    #[serde(default = "default_assets_dir")]
    pub assets: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: default_data_dir(),
            assets: default_assets_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            variants: true,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid config YAML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse configuration from YAML text. An empty document is the default config.
    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}
