//! Structural matching for pattern-policy entries
//!
//! Each `StartsWith`, `EndsWith`, `Contains` or `Custom` entry gets its own
//! task. A hit scores 1.0 and is exact only when the whole hypothesis equals
//! the keyphrase.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::task::PreparedHypothesis;
use crate::algorithm::MatchError;
use crate::domain::{CatalogueEntry, Locale, MatchPolicy, MatchResult, MatchSource};

/// A pattern-policy entry ready to be tested
#[derive(Debug, Clone)]
pub(crate) struct PatternEntry {
    pub index: usize,
    pub id: i64,
    pub policy: MatchPolicy,
    /// Trimmed and lowercased keyphrase
    pub keyphrase: String,
    /// Trimmed keyphrase with its original case, used as regex source
    pub source: String,
}

impl PatternEntry {
    pub fn new(index: usize, entry: &CatalogueEntry, locale: &Locale) -> Self {
        Self {
            index,
            id: entry.id,
            policy: entry.policy,
            keyphrase: locale.normalize(&entry.keyphrase),
            source: entry.keyphrase.trim().to_string(),
        }
    }
}

/// Compile a user-written pattern that must cover the whole hypothesis
pub fn compile_custom(pattern: &str) -> Result<Regex, MatchError> {
    RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .build()
        .map_err(|e| MatchError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Structural test for the non-regex policies on normalized strings
pub fn policy_matches(policy: MatchPolicy, input: &str, keyphrase: &str) -> bool {
    match policy {
        MatchPolicy::Matches => input == keyphrase,
        MatchPolicy::StartsWith => input.starts_with(keyphrase),
        MatchPolicy::EndsWith => input.ends_with(keyphrase),
        MatchPolicy::Contains => input.contains(keyphrase),
        // Callers compile Custom entries through `compile_custom`
        MatchPolicy::Custom => false,
    }
}

pub(crate) fn match_pattern(
    entry: &PatternEntry,
    hypotheses: &[PreparedHypothesis],
) -> Result<Option<MatchResult>, MatchError> {
    if entry.keyphrase.is_empty() {
        return Err(MatchError::EmptyOperand);
    }

    let regex = match entry.policy {
        MatchPolicy::Custom => Some(compile_custom(&entry.source)?),
        _ => None,
    };

    let mut first_hit: Option<MatchResult> = None;
    for hypothesis in hypotheses {
        let hit = match &regex {
            Some(regex) => regex.is_match(&hypothesis.normalized),
            None => policy_matches(entry.policy, &hypothesis.normalized, &entry.keyphrase),
        };
        if !hit {
            continue;
        }

        let is_exact = hypothesis.normalized == entry.keyphrase;
        let result = MatchResult {
            entry_id: entry.id,
            entry_index: entry.index,
            source: MatchSource::Pattern(entry.policy),
            input_text: hypothesis.original.clone(),
            score: 1.0,
            is_exact,
        };
        if is_exact {
            return Ok(Some(result));
        }
        if first_hit.is_none() {
            first_hit = Some(result);
        }
    }

    if let Some(hit) = &first_hit {
        debug!("{} entry #{} hit \"{}\"", entry.policy, entry.id, hit.input_text);
    }
    Ok(first_hit)
}
