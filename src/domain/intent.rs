use serde::{Deserialize, Serialize};

/// Built-in command categories the engine can resolve
///
/// Declaration order is the stable priority order used when vote counts tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Battery,
    Time,
    Date,
    Weather,
    Translate,
    Calculate,
    Volume,
    Cancel,
    Help,
    /// "What's my name" style queries; favoured on a full voting tie
    UserName,
    /// Nothing could be resolved
    Unknown,
}

impl Intent {
    /// Every intent a keyword detector can vote for
    pub const DETECTABLE: [Intent; 10] = [
        Intent::Battery,
        Intent::Time,
        Intent::Date,
        Intent::Weather,
        Intent::Translate,
        Intent::Calculate,
        Intent::Volume,
        Intent::Cancel,
        Intent::Help,
        Intent::UserName,
    ];

    /// The intent that wins a full tie when it is the runner-up
    pub const PRIVILEGED: Intent = Intent::UserName;

    /// Key used in keyword bundles
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Battery => "battery",
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Weather => "weather",
            Intent::Translate => "translate",
            Intent::Calculate => "calculate",
            Intent::Volume => "volume",
            Intent::Cancel => "cancel",
            Intent::Help => "help",
            Intent::UserName => "user_name",
            Intent::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Option<Intent> {
        Self::DETECTABLE
            .into_iter()
            .chain(std::iter::once(Intent::Unknown))
            .find(|i| i.name() == name.trim())
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One detector's verdict on one hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentVote {
    pub intent: Intent,
    pub confidence: f32,
}

impl IntentVote {
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self { intent, confidence }
    }
}
