//! End-to-end resolution of one utterance
//!
//! ```text
//! hypotheses ──> profanity filter ──┬──> Coordinator (custom commands) ──┐
//!                                   └──> IntentVoter (built-in intents) ─┴──> Resolution
//! ```
//!
//! Both paths run concurrently. A custom command wins over any voted intent.

use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{HypothesisSet, Intent, Locale, Resolution};
use crate::keywords::{CompiledKeywords, KeywordCache};
use crate::profanity;
use crate::resolve::{Coordinator, WorkerPool};
use crate::store::{CommandSource, CommandStore};
use crate::vote::IntentVoter;

/// Receives every resolution for dispatch
pub trait IntentSink {
    fn dispatch(&self, resolution: &Resolution) -> Result<()>;
}

impl<F> IntentSink for F
where
    F: Fn(&Resolution) -> Result<()>,
{
    fn dispatch(&self, resolution: &Resolution) -> Result<()> {
        self(resolution)
    }
}

pub struct Engine {
    source: Arc<dyn CommandSource>,
    coordinator: Coordinator,
    voter: IntentVoter,
    keywords: KeywordCache,
}

impl Engine {
    pub fn new(config: &Config, source: Arc<dyn CommandSource>) -> Self {
        let pool = WorkerPool::new(config.resolver.workers);
        Self {
            source,
            coordinator: Coordinator::new(
                config.algorithms.active(),
                config.resolver.custom_timeout(),
            )
            .with_pool(pool),
            voter: IntentVoter::new(pool, config.resolver.keyword_timeout()),
            keywords: KeywordCache::new(config.keyword_dir().map(Into::into)),
        }
    }

    /// Engine backed by the SQLite store named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.store_path();
        let store = CommandStore::open(&path)
            .with_context(|| format!("Failed to open command store: {}", path.display()))?;
        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Forget compiled keywords, e.g. after bundle files changed
    pub fn invalidate_keywords(&self) {
        self.keywords.invalidate();
    }

    /// Resolve the hypotheses to a custom command or a built-in intent
    ///
    /// Never fails: every internal failure degrades to a smaller answer and
    /// ultimately to [`Intent::Unknown`].
    pub fn resolve(&self, hypotheses: &HypothesisSet, locale: &Locale) -> Resolution {
        if hypotheses.is_empty() {
            debug!("No hypotheses to resolve");
            return Resolution::unknown();
        }

        let keywords = match self.keywords.get(locale) {
            Ok(keywords) => Some(keywords),
            Err(e) => {
                warn!("Keyword detection disabled for {}: {:#}", locale, e);
                None
            }
        };

        let calculate = keywords
            .as_deref()
            .map(CompiledKeywords::calculate_patterns)
            .unwrap_or_default();
        let hypotheses = profanity::filter(hypotheses, calculate, locale);
        if hypotheses.is_empty() {
            debug!("Every hypothesis was filtered out");
            return Resolution::unknown();
        }

        let entries = match self.source.load_commands(locale) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load custom commands, continuing without: {:#}", e);
                Vec::new()
            }
        };

        let (custom, intent) = thread::scope(|s| {
            let custom = s.spawn(|| self.coordinator.resolve(&hypotheses, &entries, locale));

            let intent = match &keywords {
                Some(keywords) => self.voter.vote(keywords.detectors(), &hypotheses, locale),
                None => Intent::Unknown,
            };

            let custom = custom.join().unwrap_or_else(|_| {
                warn!("Custom command resolution panicked");
                None
            });
            (custom, intent)
        });

        let command = custom.and_then(|result| {
            let entry = entries.get(result.entry_index)?;
            Some(Resolution::command(entry.clone(), result))
        });

        let resolution = command.unwrap_or_else(|| Resolution::intent(intent));
        info!("Resolved {} hypotheses to {}", hypotheses.len(), resolution);
        resolution
    }

    /// Resolve and hand the result to `sink`
    pub fn resolve_and_dispatch(
        &self,
        hypotheses: &HypothesisSet,
        locale: &Locale,
        sink: &dyn IntentSink,
    ) -> Result<Resolution> {
        let resolution = self.resolve(hypotheses, locale);
        sink.dispatch(&resolution)
            .with_context(|| format!("Failed to dispatch {}", resolution))?;
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionDescriptor, CatalogueEntry, MatchPolicy};
    use std::sync::Mutex;

    fn entry(id: i64, keyphrase: &str, policy: MatchPolicy) -> CatalogueEntry {
        CatalogueEntry::new(keyphrase, policy, &ActionDescriptor::speak("ok"), Locale::default())
            .unwrap()
            .with_id(id)
    }

    fn engine(entries: Vec<CatalogueEntry>) -> Engine {
        Engine::new(&Config::with_defaults(), Arc::new(entries))
    }

    struct BrokenSource;

    impl CommandSource for BrokenSource {
        fn load_commands(&self, _locale: &Locale) -> Result<Vec<CatalogueEntry>> {
            anyhow::bail!("disk on fire")
        }
    }

    #[test]
    fn test_custom_command_beats_intent() {
        let engine = engine(vec![entry(7, "what time is it in tokyo", MatchPolicy::Matches)]);
        let hypotheses = HypothesisSet::uniform(["what time is it in tokyo"], 0.9).unwrap();

        let resolution = engine.resolve(&hypotheses, &Locale::default());
        assert!(resolution.is_exact);
        assert_eq!(resolution.as_command().unwrap().entry.id, 7);
    }

    #[test]
    fn test_unsaved_entries_dispatch_their_own_payload() {
        let entries = ["call mom", "open the garage"]
            .into_iter()
            .map(|keyphrase| {
                CatalogueEntry::new(
                    keyphrase,
                    MatchPolicy::Matches,
                    &ActionDescriptor::speak(keyphrase),
                    Locale::default(),
                )
                .unwrap()
            })
            .collect();
        let engine = engine(entries);

        let hypotheses = HypothesisSet::uniform(["open the garage"], 0.9).unwrap();
        let resolution = engine.resolve(&hypotheses, &Locale::default());

        let command = resolution.as_command().unwrap();
        assert_eq!(command.entry.id, 0);
        assert_eq!(command.entry.keyphrase, "open the garage");
        assert_eq!(command.entry.action().unwrap(), ActionDescriptor::speak("open the garage"));
        assert!(resolution.is_exact);
    }

    #[test]
    fn test_falls_back_to_voting() {
        let engine = engine(vec![entry(1, "open the garage", MatchPolicy::Matches)]);
        let hypotheses = HypothesisSet::uniform(["how much battery is left"], 0.8).unwrap();

        let resolution = engine.resolve(&hypotheses, &Locale::default());
        assert_eq!(resolution.as_intent(), Some(Intent::Battery));
    }

    #[test]
    fn test_store_failure_degrades_to_intents() {
        let engine = Engine::new(&Config::with_defaults(), Arc::new(BrokenSource));
        let hypotheses = HypothesisSet::uniform(["what's the weather like"], 0.8).unwrap();

        let resolution = engine.resolve(&hypotheses, &Locale::default());
        assert_eq!(resolution.as_intent(), Some(Intent::Weather));
    }

    #[test]
    fn test_censored_only_input_is_unknown() {
        let engine = engine(vec![entry(1, "f", MatchPolicy::StartsWith)]);
        let hypotheses = HypothesisSet::uniform(["f*** off"], 0.8).unwrap();
        assert!(engine.resolve(&hypotheses, &Locale::default()).is_unknown());
    }

    #[test]
    fn test_dispatch_reaches_sink() {
        let engine = engine(Vec::new());
        let hypotheses = HypothesisSet::uniform(["cancel that"], 0.8).unwrap();
        let seen = Mutex::new(Vec::new());
        let sink = |r: &Resolution| -> Result<()> {
            seen.lock().unwrap().push(r.clone());
            Ok(())
        };

        let resolution = engine
            .resolve_and_dispatch(&hypotheses, &Locale::default(), &sink)
            .unwrap();
        assert_eq!(resolution.as_intent(), Some(Intent::Cancel));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sink_error_propagates() {
        let engine = engine(Vec::new());
        let hypotheses = HypothesisSet::uniform(["help"], 0.8).unwrap();
        let sink = |_: &Resolution| -> Result<()> { anyhow::bail!("speaker unplugged") };

        let err = engine
            .resolve_and_dispatch(&hypotheses, &Locale::default(), &sink)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("speaker unplugged"));
    }
}
