//! Edit-distance based similarity

/// Levenshtein similarity relative to the keyphrase length
///
/// `1 - min(d, k) / k` where `k` is the keyphrase length in chars. For a
/// fixed keyphrase the score only falls as the distance grows.
pub fn levenshtein_similarity(input: &str, keyphrase: &str) -> f64 {
    let k = keyphrase.chars().count();
    if k == 0 {
        return 0.0;
    }
    let distance = strsim::levenshtein(input, keyphrase).min(k);
    1.0 - distance as f64 / k as f64
}

pub fn jaro_winkler(input: &str, keyphrase: &str) -> f64 {
    strsim::jaro_winkler(input, keyphrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_similarity() {
        assert_eq!(levenshtein_similarity("torch", "torch"), 1.0);
        assert!((levenshtein_similarity("torh", "torch") - 0.8).abs() < 1e-9);
        assert_eq!(levenshtein_similarity("completely different", "torch"), 0.0);
    }

    #[test]
    fn test_jaro_winkler_prefers_shared_prefix() {
        let close = jaro_winkler("flashlight on", "flashlight");
        let far = jaro_winkler("on flashlight", "flashlight");
        assert!(close > far);
    }
}
