//! Similarity algorithms used to compare a hypothesis with a keyphrase
//!
//! Every algorithm scores in [0, 1] (higher is better) so results from
//! different algorithms can be ranked against each other within one call.
//! Identical inputs always produce [`Verdict::Exact`].
//!
//! Which algorithms run, and the threshold each must beat, comes from
//! [`AlgorithmSettings`](crate::config::AlgorithmSettings).

mod alignment;
mod edit;
mod fuzzy;
mod phonetic;

pub use alignment::{monge_elkan, needleman_wunsch};
pub use edit::{jaro_winkler, levenshtein_similarity};
pub use fuzzy::fuzzy_score;
pub use phonetic::{PhoneticCode, phonetic_similarity};

use serde::{Deserialize, Serialize};

/// Error type for a single comparison
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MatchError {
    #[error("Cannot compare an empty string")]
    EmptyOperand,

    #[error("{algorithm} produced no code for \"{text}\"")]
    Unencodable { algorithm: Algorithm, text: String },

    #[error("Invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Outcome of comparing one hypothesis with one keyphrase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// The normalized strings are identical
    Exact,
    /// Similarity in [0, 1]
    Scored(f64),
}

impl Verdict {
    pub fn score(&self) -> f64 {
        match self {
            Verdict::Exact => 1.0,
            Verdict::Scored(score) => *score,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Verdict::Exact)
    }
}

/// String comparison strategies available to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Levenshtein,
    JaroWinkler,
    Soundex,
    Metaphone,
    DoubleMetaphone,
    FuzzyScore,
    NeedlemanWunsch,
    MongeElkan,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Levenshtein,
        Algorithm::JaroWinkler,
        Algorithm::Soundex,
        Algorithm::Metaphone,
        Algorithm::DoubleMetaphone,
        Algorithm::FuzzyScore,
        Algorithm::NeedlemanWunsch,
        Algorithm::MongeElkan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Levenshtein => "levenshtein",
            Algorithm::JaroWinkler => "jaro_winkler",
            Algorithm::Soundex => "soundex",
            Algorithm::Metaphone => "metaphone",
            Algorithm::DoubleMetaphone => "double_metaphone",
            Algorithm::FuzzyScore => "fuzzy_score",
            Algorithm::NeedlemanWunsch => "needleman_wunsch",
            Algorithm::MongeElkan => "monge_elkan",
        }
    }

    pub fn from_name(name: &str) -> Option<Algorithm> {
        let wanted = name.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|a| a.name() == wanted)
    }

    /// Score a result must exceed to count as found
    ///
    /// Phonetic codes collapse many spellings together, so they demand that
    /// every word agrees. Edit-distance style scores tolerate roughly one
    /// slip in four characters.
    pub fn default_threshold(&self) -> f64 {
        match self {
            Algorithm::Levenshtein => 0.70,
            Algorithm::JaroWinkler => 0.90,
            Algorithm::Soundex => 0.99,
            Algorithm::Metaphone => 0.99,
            Algorithm::DoubleMetaphone => 0.99,
            Algorithm::FuzzyScore => 0.80,
            Algorithm::NeedlemanWunsch => 0.85,
            Algorithm::MongeElkan => 0.92,
        }
    }

    /// Compare an already-normalized hypothesis with a normalized keyphrase
    pub fn apply(&self, input: &str, keyphrase: &str) -> Result<Verdict, MatchError> {
        if input.is_empty() || keyphrase.is_empty() {
            return Err(MatchError::EmptyOperand);
        }
        if input == keyphrase {
            return Ok(Verdict::Exact);
        }

        let score = match self {
            Algorithm::Levenshtein => levenshtein_similarity(input, keyphrase),
            Algorithm::JaroWinkler => jaro_winkler(input, keyphrase),
            Algorithm::Soundex => phonetic_similarity(PhoneticCode::Soundex, input, keyphrase)?,
            Algorithm::Metaphone => {
                phonetic_similarity(PhoneticCode::Metaphone, input, keyphrase)?
            }
            Algorithm::DoubleMetaphone => {
                phonetic_similarity(PhoneticCode::DoubleMetaphone, input, keyphrase)?
            }
            Algorithm::FuzzyScore => fuzzy_score(input, keyphrase),
            Algorithm::NeedlemanWunsch => needleman_wunsch(input, keyphrase),
            Algorithm::MongeElkan => monge_elkan(input, keyphrase),
        };

        Ok(Verdict::Scored(score.clamp(0.0, 1.0)))
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
