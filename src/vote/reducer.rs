//! Frequency/confidence reduction of intent votes

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Intent, IntentVote};

/// Share of the top-two vote count the leader needs to win outright
pub const MAJORITY_PERCENT: f64 = 65.0;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: usize,
    /// Highest confidence among this intent's votes
    confidence: f32,
}

/// Decide the most probable intent from a multiset of votes
///
/// The leader wins outright with more than [`MAJORITY_PERCENT`] of the two
/// leading counts. Otherwise the higher associated confidence wins, then the
/// higher count. A full tie goes to the leader unless the runner-up is
/// [`Intent::PRIVILEGED`].
pub fn reduce(votes: &[IntentVote]) -> Intent {
    match votes {
        [] => return Intent::Unknown,
        [only] => return only.intent,
        _ => {}
    }

    let mut tally: BTreeMap<Intent, Tally> = BTreeMap::new();
    for vote in votes {
        let t = tally.entry(vote.intent).or_default();
        t.count += 1;
        t.confidence = t.confidence.max(vote.confidence);
    }

    // BTreeMap iterates in priority order and the sort is stable, so equal
    // counts keep that order
    let mut ranked: Vec<(Intent, Tally)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    let mut ranked = ranked.into_iter();
    let Some((first, first_tally)) = ranked.next() else {
        return Intent::Unknown;
    };
    let Some((second, second_tally)) = ranked.next() else {
        return first;
    };

    let percentage =
        first_tally.count as f64 / (first_tally.count + second_tally.count) as f64 * 100.0;
    debug!(
        "Vote: {} x{} ({:.2}) vs {} x{} ({:.2}), {:.1}%",
        first,
        first_tally.count,
        first_tally.confidence,
        second,
        second_tally.count,
        second_tally.confidence,
        percentage
    );

    if percentage > MAJORITY_PERCENT {
        return first;
    }
    if first_tally.confidence != second_tally.confidence {
        return if first_tally.confidence > second_tally.confidence {
            first
        } else {
            second
        };
    }
    if first_tally.count != second_tally.count {
        return if first_tally.count > second_tally.count {
            first
        } else {
            second
        };
    }
    if second == Intent::PRIVILEGED { second } else { first }
}
