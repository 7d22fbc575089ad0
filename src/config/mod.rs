//! Configuration loading and management

mod algorithm;
mod io;
mod settings;

pub use algorithm::AlgorithmSettings;
pub use settings::{KeywordSettings, ResolverSettings, StoreSettings};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Deadlines, pool size and default locale
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Which similarity algorithms run and their thresholds
    #[serde(default)]
    pub algorithms: AlgorithmSettings,

    /// Custom command database
    #[serde(default)]
    pub store: StoreSettings,

    /// Keyword bundle overrides
    #[serde(default)]
    pub keywords: KeywordSettings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Create a config with sensible defaults
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Database path, falling back to ~/.hark/commands.db
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("commands.db"))
    }

    /// Directory with `<locale>.toml` keyword overrides, if configured
    pub fn keyword_dir(&self) -> Option<&Path> {
        self.keywords.dir.as_deref()
    }
}
