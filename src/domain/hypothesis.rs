use serde::{Deserialize, Serialize};

/// Error type for building a hypothesis set
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HypothesisError {
    #[error("Got {texts} hypotheses but {confidences} confidence scores")]
    LengthMismatch { texts: usize, confidences: usize },

    #[error("Confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f32),
}

/// One candidate transcription from the speech recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub text: String,
    pub confidence: f32,
}

/// Ordered recognizer output, each string paired with its confidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSet {
    items: Vec<Hypothesis>,
}

impl HypothesisSet {
    /// Pair up recognizer strings with their confidence scores
    ///
    /// Both sequences must have the same length. Blank strings are dropped
    /// together with their score.
    pub fn new(texts: Vec<String>, confidences: Vec<f32>) -> Result<Self, HypothesisError> {
        if texts.len() != confidences.len() {
            return Err(HypothesisError::LengthMismatch {
                texts: texts.len(),
                confidences: confidences.len(),
            });
        }

        let mut items = Vec::with_capacity(texts.len());
        for (text, confidence) in texts.into_iter().zip(confidences) {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(HypothesisError::ConfidenceOutOfRange(confidence));
            }
            if text.trim().is_empty() {
                continue;
            }
            items.push(Hypothesis { text, confidence });
        }

        Ok(Self { items })
    }

    /// Build a set where every hypothesis carries the same confidence
    pub fn uniform<I, S>(texts: I, confidence: f32) -> Result<Self, HypothesisError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        let confidences = vec![confidence; texts.len()];
        Self::new(texts, confidences)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hypothesis> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Hypothesis> {
        self.items.get(index)
    }

    /// Keep the hypotheses matching `keep`, preserving order and pairing
    pub fn filtered(&self, mut keep: impl FnMut(&Hypothesis) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|h| keep(h)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HypothesisSet {
    type Item = &'a Hypothesis;
    type IntoIter = std::slice::Iter<'a, Hypothesis>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let err = HypothesisSet::new(vec!["a".to_string()], vec![]).unwrap_err();
        assert_eq!(
            err,
            HypothesisError::LengthMismatch {
                texts: 1,
                confidences: 0
            }
        );
    }

    #[test]
    fn test_confidence_range_checked() {
        let err = HypothesisSet::new(vec!["a".to_string()], vec![1.5]).unwrap_err();
        assert_eq!(err, HypothesisError::ConfidenceOutOfRange(1.5));
    }

    #[test]
    fn test_blank_hypotheses_dropped_with_their_score() {
        let set = HypothesisSet::new(
            vec!["one".to_string(), "  ".to_string(), "two".to_string()],
            vec![0.9, 0.8, 0.4],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().text, "two");
        assert_eq!(set.get(1).unwrap().confidence, 0.4);
    }

    #[test]
    fn test_filtered_preserves_order() {
        let set = HypothesisSet::uniform(["a", "b", "c"], 0.5).unwrap();
        let kept = set.filtered(|h| h.text != "b");
        let texts: Vec<&str> = kept.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }
}
