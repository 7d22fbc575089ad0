//! Algorithm committee settings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::algorithm::Algorithm;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmSettings {
    /// Algorithms to run, in submission order
    #[serde(default = "default_enabled")]
    pub enabled: Vec<Algorithm>,

    /// Per-algorithm acceptance threshold overrides, keyed by algorithm name
    #[serde(default)]
    pub thresholds: BTreeMap<String, f64>,
}

fn default_enabled() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            thresholds: BTreeMap::new(),
        }
    }
}

impl AlgorithmSettings {
    /// Configured threshold for `algorithm`, clamped to [0, 1]
    pub fn threshold(&self, algorithm: Algorithm) -> f64 {
        self.thresholds
            .get(algorithm.name())
            .copied()
            .unwrap_or_else(|| algorithm.default_threshold())
            .clamp(0.0, 1.0)
    }

    /// Enabled algorithms paired with their thresholds, duplicates removed
    pub fn active(&self) -> Vec<(Algorithm, f64)> {
        for name in self.thresholds.keys() {
            if Algorithm::from_name(name).is_none() {
                warn!("Ignoring threshold for unknown algorithm '{}'", name);
            }
        }

        let mut active: Vec<(Algorithm, f64)> = Vec::with_capacity(self.enabled.len());
        for &algorithm in &self.enabled {
            if active.iter().any(|(a, _)| *a == algorithm) {
                continue;
            }
            active.push((algorithm, self.threshold(algorithm)));
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_algorithm() {
        let active = AlgorithmSettings::default().active();
        assert_eq!(active.len(), Algorithm::ALL.len());
        assert!(active.iter().all(|(a, t)| *t == a.default_threshold()));
    }

    #[test]
    fn test_override_is_clamped() {
        let mut settings = AlgorithmSettings::default();
        settings.thresholds.insert("jaro_winkler".to_string(), 1.7);
        assert_eq!(settings.threshold(Algorithm::JaroWinkler), 1.0);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let settings = AlgorithmSettings {
            enabled: vec![Algorithm::Soundex, Algorithm::Levenshtein, Algorithm::Soundex],
            thresholds: BTreeMap::new(),
        };
        let order: Vec<Algorithm> = settings.active().into_iter().map(|(a, _)| a).collect();
        assert_eq!(order, vec![Algorithm::Soundex, Algorithm::Levenshtein]);
    }
}
