//! Built-in keyword sets, compiled per locale
//!
//! [`KeywordCache`] keeps the compiled detectors for the most recent locale
//! and recompiles when the locale changes or after [`KeywordCache::invalidate`].

mod bundle;

pub use bundle::KeywordBundle;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::domain::{Intent, Locale};
use crate::vote::KeywordDetector;

/// Detectors and calculate patterns ready for one locale
#[derive(Debug, Clone)]
pub struct CompiledKeywords {
    locale: Locale,
    detectors: Arc<Vec<KeywordDetector>>,
    calculate: Vec<Regex>,
}

impl CompiledKeywords {
    /// Compile every pattern of `bundle`
    ///
    /// Unknown intent names are skipped with a warning; a pattern that does
    /// not compile is an error.
    pub fn compile(locale: Locale, bundle: &KeywordBundle) -> Result<Self> {
        let mut detectors = Vec::new();
        let mut calculate = Vec::new();

        for (name, patterns) in &bundle.intents {
            let Some(intent) = Intent::from_name(name).filter(|i| *i != Intent::Unknown) else {
                warn!("Ignoring keywords for unknown intent '{}'", name);
                continue;
            };

            let compiled = patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .with_context(|| format!("Invalid {} keyword pattern: {}", name, p))
                })
                .collect::<Result<Vec<_>>>()?;

            if intent == Intent::Calculate {
                calculate = compiled.clone();
            }
            detectors.push(KeywordDetector::new(intent, compiled));
        }

        detectors.sort_by_key(|d| d.intent());
        debug!("Compiled {} keyword detectors for {}", detectors.len(), locale);

        Ok(Self {
            locale,
            detectors: Arc::new(detectors),
            calculate,
        })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn detectors(&self) -> &Arc<Vec<KeywordDetector>> {
        &self.detectors
    }

    /// Patterns recognizing arithmetic requests
    pub fn calculate_patterns(&self) -> &[Regex] {
        &self.calculate
    }
}

/// Compiled keywords for the last locale used
#[derive(Debug, Default)]
pub struct KeywordCache {
    dir: Option<PathBuf>,
    cached: Mutex<Option<Arc<CompiledKeywords>>>,
}

impl KeywordCache {
    /// `dir` holds optional `<locale>.toml` overrides
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cached: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Compiled keywords for `locale`, compiling on first use or locale change
    pub fn get(&self, locale: &Locale) -> Result<Arc<CompiledKeywords>> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(current) = cached.as_ref().filter(|c| c.locale() == locale) {
            return Ok(Arc::clone(current));
        }

        let bundle = KeywordBundle::load(locale, self.dir())?;
        let compiled = Arc::new(CompiledKeywords::compile(locale.clone(), &bundle)?);
        *cached = Some(Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Drop the compiled set so the next call reloads the bundle
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if cached.take().is_some() {
            debug!("Keyword cache invalidated");
        }
    }
}
