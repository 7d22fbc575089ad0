//! Keyword voting over the built-in intents
//!
//! Every [`KeywordDetector`] runs as its own task on a [`WorkerPool`]; the
//! votes that arrive before the deadline are folded by [`reduce`].

mod detector;
mod reducer;

pub use detector::KeywordDetector;
pub use reducer::{MAJORITY_PERCENT, reduce};

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{HypothesisSet, Intent, IntentVote, Locale};
use crate::resolve::{Job, WorkerPool};

/// Default deadline for keyword detection
pub const KEYWORD_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct IntentVoter {
    pool: WorkerPool,
    timeout: Duration,
}

impl IntentVoter {
    pub fn new(pool: WorkerPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run every detector concurrently and gather their votes
    ///
    /// Votes come back grouped by detector in submission order.
    pub fn collect(
        &self,
        detectors: &Arc<Vec<KeywordDetector>>,
        hypotheses: &HypothesisSet,
        locale: &Locale,
    ) -> Vec<IntentVote> {
        if detectors.is_empty() || hypotheses.is_empty() {
            return Vec::new();
        }

        let hypotheses = Arc::new(hypotheses.clone());
        let jobs: Vec<Job<Vec<IntentVote>>> = (0..detectors.len())
            .map(|index| {
                let detectors = Arc::clone(detectors);
                let hypotheses = Arc::clone(&hypotheses);
                let locale = locale.clone();
                Box::new(move || {
                    let votes = detectors[index].detect(&hypotheses, &locale);
                    (!votes.is_empty()).then_some(votes)
                }) as Job<Vec<IntentVote>>
            })
            .collect();

        self.pool
            .run(jobs, self.timeout)
            .into_iter()
            .flat_map(|(_, votes)| votes)
            .collect()
    }

    /// Most probable built-in intent, or [`Intent::Unknown`]
    pub fn vote(
        &self,
        detectors: &Arc<Vec<KeywordDetector>>,
        hypotheses: &HypothesisSet,
        locale: &Locale,
    ) -> Intent {
        let votes = self.collect(detectors, hypotheses, locale);
        let intent = reduce(&votes);
        debug!("{} votes reduced to {}", votes.len(), intent);
        intent
    }
}

impl Default for IntentVoter {
    fn default() -> Self {
        Self::new(WorkerPool::default(), KEYWORD_TIMEOUT)
    }
}
