/// Subsequence score with a bonus for consecutive hits
///
/// Walks the keyphrase characters through the input in order; each hit is
/// worth 1 and a hit directly after the previous one earns 2 more. The raw
/// score is divided by the best possible one over the longer of the two
/// strings, so input characters the keyphrase never uses lower the score.
pub fn fuzzy_score(input: &str, keyphrase: &str) -> f64 {
    let term: Vec<char> = input.chars().collect();
    let query: Vec<char> = keyphrase.chars().collect();
    if query.is_empty() || term.is_empty() {
        return 0.0;
    }

    let mut score = 0usize;
    let mut term_index = 0usize;
    let mut previous_hit: Option<usize> = None;

    for query_char in &query {
        while term_index < term.len() {
            let hit = term[term_index] == *query_char;
            if hit {
                score += 1;
                if previous_hit.is_some_and(|p| p + 1 == term_index) {
                    score += 2;
                }
                previous_hit = Some(term_index);
            }
            term_index += 1;
            if hit {
                break;
            }
        }
    }

    let best = 3 * query.len().max(term.len()) - 2;
    score as f64 / best as f64
}
