//! One algorithm scanned over the whole catalogue

use tracing::debug;

use crate::algorithm::{Algorithm, Verdict};
use crate::domain::{CatalogueEntry, HypothesisSet, Locale, MatchResult, MatchSource};

/// A hypothesis with its normalized form computed once per call
#[derive(Debug, Clone)]
pub(crate) struct PreparedHypothesis {
    pub original: String,
    pub normalized: String,
}

/// A catalogue entry reduced to what comparison needs
#[derive(Debug, Clone)]
pub(crate) struct PreparedEntry {
    pub index: usize,
    pub id: i64,
    pub keyphrase: String,
}

pub(crate) fn prepare_hypotheses(hypotheses: &HypothesisSet, locale: &Locale) -> Vec<PreparedHypothesis> {
    hypotheses
        .iter()
        .map(|h| PreparedHypothesis {
            original: h.text.clone(),
            normalized: locale.normalize(&h.text),
        })
        .filter(|h| !h.normalized.is_empty())
        .collect()
}

/// `entries` pairs each entry with its position in the snapshot
pub(crate) fn prepare_entries<'a>(
    entries: impl IntoIterator<Item = (usize, &'a CatalogueEntry)>,
    locale: &Locale,
) -> Vec<PreparedEntry> {
    entries
        .into_iter()
        .map(|(index, e)| PreparedEntry {
            index,
            id: e.id,
            keyphrase: locale.normalize(&e.keyphrase),
        })
        .filter(|e| !e.keyphrase.is_empty())
        .collect()
}

/// Best match one algorithm finds across every (hypothesis, entry) pair
///
/// Only scores strictly above `threshold` count. The first exact match ends
/// the scan; among scored matches the earliest pair wins a tie.
pub fn resolve_with_algorithm(
    algorithm: Algorithm,
    threshold: f64,
    entries: &[CatalogueEntry],
    hypotheses: &HypothesisSet,
    locale: &Locale,
) -> Option<MatchResult> {
    let entries = prepare_entries(entries.iter().enumerate(), locale);
    let hypotheses = prepare_hypotheses(hypotheses, locale);
    best_match(algorithm, threshold, &entries, &hypotheses)
}

pub(crate) fn best_match(
    algorithm: Algorithm,
    threshold: f64,
    entries: &[PreparedEntry],
    hypotheses: &[PreparedHypothesis],
) -> Option<MatchResult> {
    let mut best: Option<MatchResult> = None;

    for hypothesis in hypotheses {
        for entry in entries {
            let verdict = match algorithm.apply(&hypothesis.normalized, &entry.keyphrase) {
                Ok(verdict) => verdict,
                Err(e) => {
                    debug!(
                        "{} skipped entry #{} for \"{}\": {}",
                        algorithm, entry.id, hypothesis.normalized, e
                    );
                    continue;
                }
            };

            match verdict {
                Verdict::Exact => {
                    return Some(MatchResult {
                        entry_id: entry.id,
                        entry_index: entry.index,
                        source: MatchSource::Algorithm(algorithm),
                        input_text: hypothesis.original.clone(),
                        score: 1.0,
                        is_exact: true,
                    });
                }
                Verdict::Scored(score) if score > threshold => {
                    if best.as_ref().is_none_or(|b| score > b.score) {
                        best = Some(MatchResult {
                            entry_id: entry.id,
                            entry_index: entry.index,
                            source: MatchSource::Algorithm(algorithm),
                            input_text: hypothesis.original.clone(),
                            score,
                            is_exact: false,
                        });
                    }
                }
                Verdict::Scored(_) => {}
            }
        }
    }

    if let Some(found) = &best {
        debug!(
            "{} best candidate: entry #{} at {:.3}",
            algorithm, found.entry_id, found.score
        );
    }
    best
}
