//! Shared test utilities for resolution and store tests

#![allow(dead_code)]

use std::sync::Arc;

use hark::config::Config;
use hark::engine::Engine;
use hark::store::CommandStore;
use hark::{ActionDescriptor, CatalogueEntry, HypothesisSet, Locale, MatchPolicy};
use tempfile::TempDir;

/// Creates a store in a fresh temp dir; keep the dir alive for the test
pub fn create_test_store() -> (TempDir, CommandStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = CommandStore::open(&temp_dir.path().join("commands.db"))
        .expect("Failed to open command store");
    (temp_dir, store)
}

pub fn entry(keyphrase: &str, policy: MatchPolicy, response: &str) -> CatalogueEntry {
    entry_in(keyphrase, policy, response, Locale::default())
}

pub fn entry_in(keyphrase: &str, policy: MatchPolicy, response: &str, locale: Locale) -> CatalogueEntry {
    CatalogueEntry::new(keyphrase, policy, &ActionDescriptor::speak(response), locale)
        .expect("Failed to build entry")
}

/// Engine over `store` with default settings
pub fn engine_for(store: &CommandStore) -> Engine {
    Engine::new(&Config::with_defaults(), Arc::new(store.clone()))
}

/// Hypotheses with confidences falling off from 0.9
pub fn hypotheses(texts: &[&str]) -> HypothesisSet {
    let confidences = (0..texts.len())
        .map(|i| (0.9 - 0.1 * i as f32).max(0.1))
        .collect();
    HypothesisSet::new(texts.iter().map(|t| t.to_string()).collect(), confidences)
        .expect("Failed to build hypotheses")
}
