//! Settings sections

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Locale;
use crate::resolve::CUSTOM_COMMAND_TIMEOUT;
use crate::vote::KEYWORD_TIMEOUT;

/// Resolver deadlines and pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Deadline for custom-command matching
    #[serde(default = "default_custom_timeout_ms")]
    pub custom_timeout_ms: u64,

    /// Deadline for built-in keyword detection
    #[serde(default = "default_keyword_timeout_ms")]
    pub keyword_timeout_ms: u64,

    /// Worker threads per resolution (0 = available parallelism)
    #[serde(default)]
    pub workers: usize,

    /// Locale used when the caller does not name one
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_custom_timeout_ms() -> u64 {
    CUSTOM_COMMAND_TIMEOUT.as_millis() as u64
}

fn default_keyword_timeout_ms() -> u64 {
    KEYWORD_TIMEOUT.as_millis() as u64
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            custom_timeout_ms: default_custom_timeout_ms(),
            keyword_timeout_ms: default_keyword_timeout_ms(),
            workers: 0,
            locale: default_locale(),
        }
    }
}

impl ResolverSettings {
    pub fn custom_timeout(&self) -> Duration {
        Duration::from_millis(self.custom_timeout_ms)
    }

    pub fn keyword_timeout(&self) -> Duration {
        Duration::from_millis(self.keyword_timeout_ms)
    }

    pub fn locale(&self) -> Locale {
        Locale::new(&self.locale)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite file holding custom commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordSettings {
    /// Directory of `<locale>.toml` bundles overriding the built-in ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
