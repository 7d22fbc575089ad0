//! Init command implementation

use anyhow::{Result, bail};
use std::path::PathBuf;

use hark::config::Config;

/// Default configuration content for hark init
pub const DEFAULT_CONFIG: &str = r#"# hark configuration
# ==================
#
# Spoken hypotheses are matched against your custom commands first and the
# built-in intents (battery, time, weather, ...) second.

# ============================================================================
# RESOLVER
# ============================================================================
#
#   custom_timeout_ms  - Deadline for matching custom commands (default: 500)
#   keyword_timeout_ms - Deadline for built-in keyword detection (default: 1000)
#   workers            - Worker threads per resolution, 0 = one per core
#   locale             - Locale used when none is given (default: "en")

[resolver]
custom_timeout_ms = 500
keyword_timeout_ms = 1000
workers = 0
locale = "en"

# ============================================================================
# ALGORITHMS - How "matches" commands tolerate recognition errors
# ============================================================================
#
# Every enabled algorithm scans all commands; the best result across all of
# them wins. A score must be strictly above the threshold to count.
#
# Default thresholds:
#   levenshtein = 0.70, jaro_winkler = 0.90, soundex = 0.99, metaphone = 0.99,
#   double_metaphone = 0.99, fuzzy_score = 0.80, needleman_wunsch = 0.85,
#   monge_elkan = 0.92

[algorithms]
enabled = [
    "levenshtein",
    "jaro_winkler",
    "soundex",
    "metaphone",
    "double_metaphone",
    "fuzzy_score",
    "needleman_wunsch",
    "monge_elkan",
]

[algorithms.thresholds]
# levenshtein = 0.75

# ============================================================================
# STORAGE
# ============================================================================

[store]
# path = "~/.hark/commands.db"

# ============================================================================
# KEYWORDS - Override built-in keyword patterns with <locale>.toml files
# ============================================================================

[keywords]
# dir = "/path/to/keywords"
"#;

/// Write the commented default configuration
pub async fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_built_in_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let defaults = Config::with_defaults();

        assert_eq!(parsed.resolver.custom_timeout_ms, defaults.resolver.custom_timeout_ms);
        assert_eq!(parsed.resolver.keyword_timeout_ms, defaults.resolver.keyword_timeout_ms);
        assert_eq!(parsed.resolver.locale, defaults.resolver.locale);
        assert_eq!(parsed.algorithms.active(), defaults.algorithms.active());
        assert!(parsed.store.path.is_none());
    }
}
