//! Drops hypotheses the recognizer censored
//!
//! Recognizers mask profanity with runs of `*`. Such hypotheses are removed
//! before matching unless they read like arithmetic, where `*` is a
//! multiplication sign.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::{HypothesisSet, Locale};

static CENSORED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

/// True when `text` carries a censorship mask
pub fn is_censored(text: &str) -> bool {
    CENSORED.is_match(text)
}

/// Remove censored hypotheses, keeping those that match a calculate pattern
///
/// Order and confidences of the survivors are preserved.
pub fn filter(hypotheses: &HypothesisSet, calculate: &[Regex], locale: &Locale) -> HypothesisSet {
    let filtered = hypotheses.filtered(|h| {
        if !is_censored(&h.text) {
            return true;
        }
        let normalized = locale.normalize(&h.text);
        calculate.iter().any(|p| p.is_match(&normalized))
    });

    if filtered.len() != hypotheses.len() {
        debug!(
            "Dropped {} censored hypotheses",
            hypotheses.len() - filtered.len()
        );
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculate() -> Vec<Regex> {
        vec![
            Regex::new(r"^(calculate|compute)\b").unwrap(),
            Regex::new(r"\d+\s*(\*|x|times)\s*\d").unwrap(),
        ]
    }

    #[test]
    fn test_arithmetic_survives() {
        let hypotheses = HypothesisSet::uniform(["calculate 5 * 3"], 0.9).unwrap();
        let filtered = filter(&hypotheses, &calculate(), &Locale::default());
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_censored_text_is_removed() {
        let hypotheses = HypothesisSet::uniform(["f*** off"], 0.9).unwrap();
        assert!(filter(&hypotheses, &calculate(), &Locale::default()).is_empty());
    }

    #[test]
    fn test_order_and_confidence_preserved() {
        let hypotheses = HypothesisSet::new(
            vec![
                "turn on the lights".to_string(),
                "turn on the ****".to_string(),
                "Compute 4*4".to_string(),
            ],
            vec![0.9, 0.8, 0.1],
        )
        .unwrap();

        let filtered = filter(&hypotheses, &calculate(), &Locale::default());
        let kept: Vec<(&str, f32)> = filtered.iter().map(|h| (h.text.as_str(), h.confidence)).collect();
        assert_eq!(kept, vec![("turn on the lights", 0.9), ("Compute 4*4", 0.1)]);
    }
}
