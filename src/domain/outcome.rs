use serde::{Deserialize, Serialize};

use super::{CatalogueEntry, Intent, MatchPolicy};
use crate::algorithm::Algorithm;

/// What produced a match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum MatchSource {
    /// A fuzzy algorithm over `Matches` entries
    Algorithm(Algorithm),
    /// A structural test for a pattern-policy entry
    Pattern(MatchPolicy),
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::Algorithm(a) => write!(f, "{}", a),
            MatchSource::Pattern(p) => write!(f, "{}", p),
        }
    }
}

/// Best candidate found by one resolver task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Id of the catalogue entry that matched, 0 when it was never stored
    pub entry_id: i64,
    /// Position of the matched entry in the resolved snapshot
    pub entry_index: usize,
    pub source: MatchSource,
    /// The hypothesis text as the recognizer produced it
    pub input_text: String,
    /// In [0, 1], higher is better
    pub score: f64,
    /// Exact matches beat every scored match
    pub is_exact: bool,
}

/// A custom command chosen by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMatch {
    pub entry: CatalogueEntry,
    pub result: MatchResult,
}

/// The winner of one resolution call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolved {
    Command(Box<CommandMatch>),
    Intent(Intent),
}

/// The only value that leaves the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub resolved: Resolved,
    pub is_exact: bool,
}

impl Resolution {
    pub fn unknown() -> Self {
        Self::intent(Intent::Unknown)
    }

    pub fn intent(intent: Intent) -> Self {
        Self {
            resolved: Resolved::Intent(intent),
            is_exact: false,
        }
    }

    pub fn command(entry: CatalogueEntry, result: MatchResult) -> Self {
        let is_exact = result.is_exact;
        Self {
            resolved: Resolved::Command(Box::new(CommandMatch { entry, result })),
            is_exact,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.resolved, Resolved::Intent(Intent::Unknown))
    }

    /// The built-in intent, if this resolution is not a custom command
    pub fn as_intent(&self) -> Option<Intent> {
        match &self.resolved {
            Resolved::Intent(intent) => Some(*intent),
            Resolved::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandMatch> {
        match &self.resolved {
            Resolved::Command(m) => Some(m),
            Resolved::Intent(_) => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.resolved {
            Resolved::Intent(intent) => write!(f, "intent {}", intent),
            Resolved::Command(m) => write!(
                f,
                "command #{} \"{}\" via {} (score {:.3}{})",
                m.entry.id,
                m.entry.keyphrase,
                m.result.source,
                m.result.score,
                if self.is_exact { ", exact" } else { "" }
            ),
        }
    }
}
