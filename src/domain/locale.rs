use serde::{Deserialize, Serialize};

/// Language tag used for normalization and keyword bundle selection
///
/// Tags are stored lowercased with `-` as separator, so `en_US` and `en-us`
/// name the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim().replace('_', "-").to_lowercase();
        if tag.is_empty() {
            Self::default()
        } else {
            Self(tag)
        }
    }

    /// The full tag (e.g. "en-us")
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (e.g. "en" for "en-us")
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// Lowercase under this locale's rules
    ///
    /// Turkish and Azeri map dotted and dotless capital I to their own
    /// lowercase letters instead of the default Unicode mapping.
    pub fn lowercase(&self, text: &str) -> String {
        match self.language() {
            "tr" | "az" => text
                .chars()
                .flat_map(|c| match c {
                    'I' => vec!['ı'],
                    'İ' => vec!['i'],
                    other => other.to_lowercase().collect(),
                })
                .collect(),
            _ => text.to_lowercase(),
        }
    }

    /// Trim and lowercase, the normalization applied before every comparison
    pub fn normalize(&self, text: &str) -> String {
        self.lowercase(text.trim())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
