//! Core domain types for Hark

mod action;
mod entry;
mod hypothesis;
mod intent;
mod locale;
mod outcome;

pub use action::ActionDescriptor;
pub use entry::{CatalogueEntry, EntryError, MatchPolicy};
pub use hypothesis::{Hypothesis, HypothesisError, HypothesisSet};
pub use intent::{Intent, IntentVote};
pub use locale::Locale;
pub use outcome::{CommandMatch, MatchResult, MatchSource, Resolution, Resolved};
