use serde::{Deserialize, Serialize};

use super::{ActionDescriptor, Locale};

/// Error type for catalogue entries
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Keyphrase must not be empty")]
    EmptyKeyphrase,

    #[error("Unknown match policy: {0}")]
    UnknownPolicy(String),

    #[error("Failed to serialize action: {0}")]
    Payload(#[from] serde_json::Error),
}

/// How a catalogue entry's keyphrase is compared against a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPolicy {
    /// Whole phrase, routed through the fuzzy algorithm set
    Matches,
    /// Hypothesis starts with the keyphrase
    StartsWith,
    /// Hypothesis ends with the keyphrase
    EndsWith,
    /// Hypothesis contains the keyphrase
    Contains,
    /// Keyphrase is a user-written regular expression over the whole hypothesis
    Custom,
}

impl MatchPolicy {
    pub const ALL: [MatchPolicy; 5] = [
        MatchPolicy::Matches,
        MatchPolicy::StartsWith,
        MatchPolicy::EndsWith,
        MatchPolicy::Contains,
        MatchPolicy::Custom,
    ];

    /// Name stored in the `match_policy` column
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Matches => "MATCHES",
            MatchPolicy::StartsWith => "STARTS_WITH",
            MatchPolicy::EndsWith => "ENDS_WITH",
            MatchPolicy::Contains => "CONTAINS",
            MatchPolicy::Custom => "CUSTOM",
        }
    }

    /// Policies resolved by a structural test rather than fuzzy scoring
    pub fn is_pattern(&self) -> bool {
        !matches!(self, MatchPolicy::Matches)
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_uppercase();
        MatchPolicy::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| EntryError::UnknownPolicy(s.to_string()))
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A keyphrase-to-action record
///
/// `id` is assigned by the store; entries that were never persisted carry 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub id: i64,
    pub keyphrase: String,
    pub policy: MatchPolicy,
    /// Serialized [`ActionDescriptor`], opaque to the resolver
    pub payload: String,
    pub locale: Locale,
}

impl CatalogueEntry {
    pub fn new(
        keyphrase: impl Into<String>,
        policy: MatchPolicy,
        action: &ActionDescriptor,
        locale: Locale,
    ) -> Result<Self, EntryError> {
        let keyphrase = keyphrase.into();
        if keyphrase.trim().is_empty() {
            return Err(EntryError::EmptyKeyphrase);
        }

        Ok(Self {
            id: 0,
            keyphrase,
            policy,
            payload: action.to_payload()?,
            locale,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Keyphrase trimmed and lowercased under the entry's own locale
    pub fn normalized_keyphrase(&self) -> String {
        self.locale.normalize(&self.keyphrase)
    }

    /// Decode the payload for dispatch
    pub fn action(&self) -> Result<ActionDescriptor, serde_json::Error> {
        ActionDescriptor::from_payload(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("starts_with".parse::<MatchPolicy>().unwrap(), MatchPolicy::StartsWith);
        assert_eq!("ENDS-WITH".parse::<MatchPolicy>().unwrap(), MatchPolicy::EndsWith);
        assert_eq!("custom".parse::<MatchPolicy>().unwrap(), MatchPolicy::Custom);
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn test_only_matches_is_fuzzy() {
        assert!(!MatchPolicy::Matches.is_pattern());
        assert!(MatchPolicy::Contains.is_pattern());
        assert!(MatchPolicy::Custom.is_pattern());
    }

    #[test]
    fn test_empty_keyphrase_rejected() {
        let result = CatalogueEntry::new(
            "   ",
            MatchPolicy::Matches,
            &ActionDescriptor::speak("hi"),
            Locale::default(),
        );
        assert!(matches!(result, Err(EntryError::EmptyKeyphrase)));
    }

    #[test]
    fn test_payload_round_trips_through_entry() {
        let action = ActionDescriptor::OpenUrl {
            url: "https://example.org".to_string(),
        };
        let entry =
            CatalogueEntry::new(" Open News ", MatchPolicy::Matches, &action, Locale::default())
                .unwrap();

        assert_eq!(entry.normalized_keyphrase(), "open news");
        assert_eq!(entry.action().unwrap(), action);
    }
}
