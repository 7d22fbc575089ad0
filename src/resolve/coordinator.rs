//! Fan-out/fan-in resolution of custom commands
//!
//! ```text
//! Idle ──> FannedOut ──> Collecting ──> Reduced ──> Done
//!            │               │
//!            │ one task per  │ recv_timeout until
//!            │ pattern entry │ the deadline
//!            │ + one per     │
//!            │ algorithm     │
//! ```

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::pattern::{PatternEntry, match_pattern};
use super::pool::{Job, WorkerPool};
use super::task::{best_match, prepare_entries, prepare_hypotheses};
use crate::algorithm::Algorithm;
use crate::domain::{CatalogueEntry, HypothesisSet, Locale, MatchResult};

/// Default deadline for custom-command matching
pub const CUSTOM_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    FannedOut,
    Collecting,
    Reduced,
    Done,
}

fn advance(phase: &mut Phase, next: Phase) {
    debug!("coordinator {:?} -> {:?}", phase, next);
    *phase = next;
}

/// Runs the algorithm committee and pattern matchers over one snapshot
#[derive(Debug, Clone)]
pub struct Coordinator {
    pool: WorkerPool,
    algorithms: Vec<(Algorithm, f64)>,
    timeout: Duration,
}

impl Coordinator {
    /// `algorithms` pairs each enabled algorithm with its acceptance threshold
    pub fn new(algorithms: Vec<(Algorithm, f64)>, timeout: Duration) -> Self {
        Self {
            pool: WorkerPool::default(),
            algorithms,
            timeout,
        }
    }

    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn algorithms(&self) -> &[(Algorithm, f64)] {
        &self.algorithms
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Find the custom command the hypotheses most likely refer to
    ///
    /// Returns `None` when nothing matched, when either input is empty, or
    /// when no task finished before the deadline.
    pub fn resolve(
        &self,
        hypotheses: &HypothesisSet,
        entries: &[CatalogueEntry],
        locale: &Locale,
    ) -> Option<MatchResult> {
        let mut phase = Phase::Idle;

        if hypotheses.is_empty() || entries.is_empty() {
            debug!(
                "Nothing to resolve ({} hypotheses, {} entries)",
                hypotheses.len(),
                entries.len()
            );
            return None;
        }

        let prepared = Arc::new(prepare_hypotheses(hypotheses, locale));
        let (patterns, fuzzy): (Vec<(usize, &CatalogueEntry)>, Vec<(usize, &CatalogueEntry)>) =
            entries.iter().enumerate().partition(|(_, e)| e.policy.is_pattern());

        let mut jobs: Vec<Job<MatchResult>> =
            Vec::with_capacity(patterns.len() + self.algorithms.len());

        for (index, entry) in patterns {
            let entry = PatternEntry::new(index, entry, locale);
            let hypotheses = Arc::clone(&prepared);
            jobs.push(Box::new(move || match match_pattern(&entry, &hypotheses) {
                Ok(found) => found,
                Err(e) => {
                    warn!("Skipping custom command #{}: {}", entry.id, e);
                    None
                }
            }));
        }

        if !fuzzy.is_empty() {
            let fuzzy = Arc::new(prepare_entries(fuzzy, locale));
            for &(algorithm, threshold) in &self.algorithms {
                let entries = Arc::clone(&fuzzy);
                let hypotheses = Arc::clone(&prepared);
                jobs.push(Box::new(move || {
                    best_match(algorithm, threshold, &entries, &hypotheses)
                }));
            }
        }

        if jobs.is_empty() {
            return None;
        }

        advance(&mut phase, Phase::FannedOut);
        let submitted = jobs.len();

        advance(&mut phase, Phase::Collecting);
        let results = self.pool.run(jobs, self.timeout);
        debug!("{} of {} tasks reported a match", results.len(), submitted);

        advance(&mut phase, Phase::Reduced);
        let winner = select_winner(results);

        advance(&mut phase, Phase::Done);
        winner
    }
}

/// Tie-break over task results tagged with their submission index
///
/// The exact match submitted first wins. Otherwise the highest score wins,
/// with equal scores going to the earlier submission.
pub fn select_winner(mut results: Vec<(usize, MatchResult)>) -> Option<MatchResult> {
    if let Some(position) = results
        .iter()
        .enumerate()
        .filter(|(_, (_, r))| r.is_exact)
        .min_by_key(|(_, (index, _))| *index)
        .map(|(position, _)| position)
    {
        return Some(results.swap_remove(position).1);
    }

    results.sort_by(|a, b| {
        b.1.score
            .partial_cmp(&a.1.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    results.into_iter().next().map(|(_, r)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionDescriptor, MatchPolicy, MatchSource};

    fn entry(id: i64, keyphrase: &str, policy: MatchPolicy) -> CatalogueEntry {
        CatalogueEntry::new(keyphrase, policy, &ActionDescriptor::speak("ok"), Locale::default())
            .unwrap()
            .with_id(id)
    }

    fn all_algorithms() -> Vec<(Algorithm, f64)> {
        Algorithm::ALL
            .into_iter()
            .map(|a| (a, a.default_threshold()))
            .collect()
    }

    fn result(entry_id: i64, score: f64, is_exact: bool) -> MatchResult {
        MatchResult {
            entry_id,
            entry_index: entry_id as usize,
            source: MatchSource::Algorithm(Algorithm::Levenshtein),
            input_text: String::new(),
            score,
            is_exact,
        }
    }

    #[test]
    fn test_exact_beats_higher_scores() {
        let winner = select_winner(vec![
            (0, result(1, 0.99, false)),
            (3, result(2, 1.0, true)),
            (5, result(3, 1.0, true)),
        ])
        .unwrap();
        assert_eq!(winner.entry_id, 2);
    }

    #[test]
    fn test_score_ties_go_to_earlier_submission() {
        let winner = select_winner(vec![
            (4, result(1, 0.9, false)),
            (2, result(2, 0.9, false)),
            (7, result(3, 0.8, false)),
        ])
        .unwrap();
        assert_eq!(winner.entry_id, 2);
    }

    #[test]
    fn test_empty_results() {
        assert!(select_winner(Vec::new()).is_none());
    }

    #[test]
    fn test_exact_match_precedence() {
        let entries = vec![
            entry(1, "turn on the light", MatchPolicy::Matches),
            entry(2, "turn on the lights", MatchPolicy::Matches),
            entry(3, "turn", MatchPolicy::StartsWith),
        ];
        let hypotheses = HypothesisSet::new(
            vec!["turn on the lights".to_string(), "turn on the light".to_string()],
            vec![0.9, 0.4],
        )
        .unwrap();

        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));
        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();

        assert!(winner.is_exact);
        assert!(winner.entry_id == 1 || winner.entry_id == 2);
    }

    #[test]
    fn test_fuzzy_match_without_exact() {
        let entries = vec![
            entry(1, "open the garage door", MatchPolicy::Matches),
            entry(2, "what time is it", MatchPolicy::Matches),
        ];
        let hypotheses = HypothesisSet::uniform(["open the garage dor"], 0.6).unwrap();

        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));
        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();

        assert_eq!(winner.entry_id, 1);
        assert!(!winner.is_exact);
    }

    #[test]
    fn test_short_keyphrase_inside_input_does_not_win() {
        let entries = vec![
            entry(1, "open", MatchPolicy::Matches),
            entry(2, "open the door", MatchPolicy::Matches),
        ];
        let hypotheses = HypothesisSet::uniform(["open the doors"], 0.8).unwrap();

        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));
        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();

        assert_eq!(winner.entry_id, 2);
        assert_eq!(winner.entry_index, 1);
        assert!(!winner.is_exact);
    }

    #[test]
    fn test_keyphrase_inside_long_sentence_is_rejected() {
        let entries = vec![entry(1, "lights on", MatchPolicy::Matches)];
        let hypotheses = HypothesisSet::uniform(
            ["are the lights on in the garden shed tonight or not"],
            0.8,
        )
        .unwrap();

        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));
        assert!(
            coordinator
                .resolve(&hypotheses, &entries, &Locale::default())
                .is_none()
        );
    }

    #[test]
    fn test_unsaved_entries_are_told_apart_by_index() {
        let entries: Vec<CatalogueEntry> = ["call mom", "lights", "open the garage"]
            .into_iter()
            .zip([MatchPolicy::Matches, MatchPolicy::Contains, MatchPolicy::Matches])
            .map(|(keyphrase, policy)| {
                CatalogueEntry::new(keyphrase, policy, &ActionDescriptor::speak("ok"), Locale::default())
                    .unwrap()
            })
            .collect();
        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));

        let hypotheses = HypothesisSet::uniform(["open the garage"], 0.8).unwrap();
        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();
        assert_eq!(winner.entry_id, 0);
        assert_eq!(winner.entry_index, 2);

        let hypotheses = HypothesisSet::uniform(["kitchen lights please"], 0.8).unwrap();
        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();
        assert_eq!(winner.entry_index, 1);
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            entry(1, "call mom", MatchPolicy::Matches),
            entry(2, "call tom", MatchPolicy::Matches),
            entry(3, "play", MatchPolicy::StartsWith),
        ];
        let hypotheses = HypothesisSet::uniform(["call mum", "cool mom"], 0.5).unwrap();
        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));

        let first = coordinator.resolve(&hypotheses, &entries, &Locale::default());
        let second = coordinator.resolve(&hypotheses, &entries, &Locale::default());
        assert_eq!(
            first.map(|r| r.entry_id),
            second.map(|r| r.entry_id)
        );
    }

    #[test]
    fn test_empty_inputs_short_circuit() {
        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));
        let entries = vec![entry(1, "call mom", MatchPolicy::Matches)];

        assert!(
            coordinator
                .resolve(&HypothesisSet::default(), &entries, &Locale::default())
                .is_none()
        );
        let hypotheses = HypothesisSet::uniform(["call mom"], 0.5).unwrap();
        assert!(
            coordinator
                .resolve(&hypotheses, &[], &Locale::default())
                .is_none()
        );
    }

    #[test]
    fn test_broken_pattern_entry_does_not_abort() {
        let entries = vec![
            entry(1, "call (", MatchPolicy::Custom),
            entry(2, "call mom", MatchPolicy::Matches),
        ];
        let hypotheses = HypothesisSet::uniform(["call mom"], 0.5).unwrap();
        let coordinator = Coordinator::new(all_algorithms(), Duration::from_secs(5));

        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();
        assert_eq!(winner.entry_id, 2);
        assert!(winner.is_exact);
    }

    #[test]
    fn test_no_algorithms_still_runs_patterns() {
        let entries = vec![entry(4, "lights", MatchPolicy::EndsWith)];
        let hypotheses = HypothesisSet::uniform(["kitchen lights"], 0.5).unwrap();
        let coordinator = Coordinator::new(Vec::new(), Duration::from_secs(5));

        let winner = coordinator
            .resolve(&hypotheses, &entries, &Locale::default())
            .unwrap();
        assert_eq!(winner.entry_id, 4);
        assert_eq!(winner.source, MatchSource::Pattern(MatchPolicy::EndsWith));
    }
}
