//! Localized keyword bundles
//!
//! A bundle maps intent names to regex patterns. `en` and `de` ship inside
//! the binary; a directory of `<locale>.toml` files can override them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Locale;

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../../assets/keywords/en.toml")),
    ("de", include_str!("../../assets/keywords/de.toml")),
];

const FALLBACK_LANGUAGE: &str = "en";

/// Raw keyword patterns for one locale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordBundle {
    #[serde(default)]
    pub locale: String,

    /// Intent name -> patterns
    #[serde(default)]
    pub intents: BTreeMap<String, Vec<String>>,
}

impl KeywordBundle {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse keyword bundle")
    }

    /// Bundle compiled into the binary for `language`, if any
    pub fn embedded(language: &str) -> Option<Self> {
        EMBEDDED
            .iter()
            .find(|(lang, _)| *lang == language)
            .and_then(|(lang, content)| match Self::from_toml(content) {
                Ok(bundle) => Some(bundle),
                Err(e) => {
                    warn!("Embedded keyword bundle '{}' is invalid: {:#}", lang, e);
                    None
                }
            })
    }

    /// Languages with an embedded bundle
    pub fn embedded_languages() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(lang, _)| *lang)
    }

    /// Resolve the bundle for `locale`
    ///
    /// Looks in `dir` for `<tag>.toml` then `<language>.toml`, then at the
    /// embedded bundles, and finally falls back to English.
    pub fn load(locale: &Locale, dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            for name in [locale.tag(), locale.language()] {
                let path = dir.join(format!("{}.toml", name));
                if path.is_file() {
                    let content = std::fs::read_to_string(&path).with_context(|| {
                        format!("Failed to read keyword bundle: {}", path.display())
                    })?;
                    debug!("Loaded keyword bundle from {}", path.display());
                    return Self::from_toml(&content)
                        .with_context(|| format!("Invalid keyword bundle: {}", path.display()));
                }
            }
        }

        if let Some(bundle) = Self::embedded(locale.language()) {
            return Ok(bundle);
        }

        warn!(
            "No keyword bundle for locale '{}', falling back to '{}'",
            locale, FALLBACK_LANGUAGE
        );
        match Self::embedded(FALLBACK_LANGUAGE) {
            Some(bundle) => Ok(bundle),
            None => bail!("Fallback keyword bundle '{}' is unavailable", FALLBACK_LANGUAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_bundles_parse() {
        for lang in KeywordBundle::embedded_languages() {
            let bundle = KeywordBundle::embedded(lang).unwrap();
            assert_eq!(bundle.locale, lang);
            assert!(bundle.intents.contains_key("calculate"));
        }
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let bundle = KeywordBundle::load(&Locale::new("xx"), None).unwrap();
        assert_eq!(bundle.locale, "en");
    }

    #[test]
    fn test_region_uses_language_bundle() {
        let bundle = KeywordBundle::load(&Locale::new("de_AT"), None).unwrap();
        assert_eq!(bundle.locale, "de");
    }

    #[test]
    fn test_directory_override() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("en.toml"),
            "locale = \"en\"\n[intents]\ntime = ['\\bclock\\b']\n",
        )
        .unwrap();

        let bundle = KeywordBundle::load(&Locale::new("en-GB"), Some(dir.path())).unwrap();
        assert_eq!(bundle.intents["time"], vec![r"\bclock\b".to_string()]);
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("en.toml"), "intents = 3").unwrap();
        assert!(KeywordBundle::load(&Locale::new("en"), Some(dir.path())).is_err());
    }
}
