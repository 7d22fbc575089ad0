//! Per-intent keyword detection

use regex::Regex;

use crate::domain::{HypothesisSet, Intent, IntentVote, Locale};

/// Tests hypotheses against one intent's keyword patterns
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    intent: Intent,
    patterns: Vec<Regex>,
}

impl KeywordDetector {
    pub fn new(intent: Intent, patterns: Vec<Regex>) -> Self {
        Self { intent, patterns }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// True if any pattern occurs in the already-normalized `text`
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// One vote per matching hypothesis, carrying that hypothesis' confidence
    pub fn detect(&self, hypotheses: &HypothesisSet, locale: &Locale) -> Vec<IntentVote> {
        hypotheses
            .iter()
            .filter(|h| self.matches(&locale.normalize(&h.text)))
            .map(|h| IntentVote::new(self.intent, h.confidence))
            .collect()
    }
}
