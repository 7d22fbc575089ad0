//! Action descriptors carried as the payload of custom commands.
//!
//! The resolver never looks inside a payload; it hands the matched entry to
//! the dispatcher, which deserializes it into an [`ActionDescriptor`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a custom command does once it has been resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDescriptor {
    /// Speak a fixed response
    Speak { response: String },
    /// Launch an installed application by package name
    LaunchApplication { package: String },
    /// Open a URL in the default handler
    OpenUrl { url: String },
    /// Fire a platform intent with optional string extras
    Intent {
        action: String,
        #[serde(default)]
        extras: BTreeMap<String, String>,
    },
}

impl ActionDescriptor {
    pub fn speak(response: impl Into<String>) -> Self {
        Self::Speak {
            response: response.into(),
        }
    }

    /// Serialize into the opaque payload stored with a command
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Short label for listings
    pub fn summary(&self) -> String {
        match self {
            ActionDescriptor::Speak { response } => format!("speak \"{}\"", response),
            ActionDescriptor::LaunchApplication { package } => format!("launch {}", package),
            ActionDescriptor::OpenUrl { url } => format!("open {}", url),
            ActionDescriptor::Intent { action, .. } => format!("intent {}", action),
        }
    }
}
