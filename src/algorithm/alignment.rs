//! Sequence-alignment style similarity

const MATCH: i64 = 1;
const MISMATCH: i64 = -1;
const GAP: i64 = -1;

/// Needleman-Wunsch global alignment, normalized into [0, 1]
///
/// The raw score lies between `-max_len` (everything gapped or mismatched)
/// and `max_len` (identical strings).
pub fn needleman_wunsch(input: &str, keyphrase: &str) -> f64 {
    let a: Vec<char> = input.chars().collect();
    let b: Vec<char> = keyphrase.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 0.0;
    }

    let mut prev: Vec<i64> = (0..=b.len() as i64).map(|j| j * GAP).collect();
    let mut curr = vec![0i64; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i as i64 * GAP;
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { MATCH } else { MISMATCH };
            curr[j] = (prev[j - 1] + substitution)
                .max(prev[j] + GAP)
                .max(curr[j - 1] + GAP);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let raw = prev[b.len()] as f64;
    let bound = max_len as f64;
    (raw + bound) / (2.0 * bound)
}

/// Monge-Elkan token similarity with Jaro-Winkler as the inner measure
///
/// Averages, over the tokens of one side, the best match among the other
/// side's tokens. Computed both ways and the lower value kept, so neither
/// extra input words nor a missing keyphrase word go unnoticed.
pub fn monge_elkan(input: &str, keyphrase: &str) -> f64 {
    let input_tokens: Vec<&str> = input.split_whitespace().collect();
    let key_tokens: Vec<&str> = keyphrase.split_whitespace().collect();
    if input_tokens.is_empty() || key_tokens.is_empty() {
        return 0.0;
    }

    directed_monge_elkan(&input_tokens, &key_tokens)
        .min(directed_monge_elkan(&key_tokens, &input_tokens))
}

fn directed_monge_elkan(from: &[&str], to: &[&str]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| {
            to.iter()
                .map(|b| strsim::jaro_winkler(a, b))
                .fold(0.0, f64::max)
        })
        .sum();
    total / from.len() as f64
}
