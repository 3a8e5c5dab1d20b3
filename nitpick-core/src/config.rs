//! Configuration management for nitpick

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::variant::{find_variant, VariantInfo, DEFAULT_VARIANT};

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Root directory where model variants are stored
    pub model_dir: PathBuf,
    /// Variant id to use when none is given on the command line
    pub variant: String,
    /// Absolute path to a model directory, overriding model_dir/variant
    /// resolution entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let model_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nitpick")
            .join("models");

        Self {
            model_dir,
            variant: DEFAULT_VARIANT.to_string(),
            path: None,
        }
    }
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature; unset means greedy decoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling cutoff; only used when temperature is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// RNG seed for sampling
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: None,
            top_p: None,
            seed: 299792458,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model settings
    pub models: ModelsConfig,
    /// Generation settings
    pub generation: GenerationConfig,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nitpick")
            .join("config.toml")
    }

    /// Load configuration from the default path, or return defaults
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from a specific path, or return defaults
    pub fn load_from(path: &PathBuf) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(e) => {
                debug!("Config file not found at {:?}: {}", path, e);
                debug!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)?;

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Format config as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the variant to use, preferring a command-line override
    pub fn resolve_variant(&self, cli_variant: Option<&str>) -> Result<VariantInfo> {
        let id = cli_variant.unwrap_or(&self.models.variant);
        find_variant(id).ok_or_else(|| Error::Config(format!("Unknown variant: {id}")))
    }

    /// Resolve the model directory for a variant.
    ///
    /// A command-line override wins, then the config `path` override, then
    /// the model root joined with the variant's directory name.
    pub fn model_dir_for(&self, variant: &VariantInfo, cli_dir: Option<&PathBuf>) -> PathBuf {
        if let Some(dir) = cli_dir {
            return dir.clone();
        }
        if let Some(path) = &self.models.path {
            return path.clone();
        }
        self.models.model_dir.join(&variant.dir_name)
    }
}
