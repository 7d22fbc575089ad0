//! Custom-command persistence

mod db;

pub use db::CommandStore;

use anyhow::Result;

use crate::domain::{CatalogueEntry, Locale};

/// Anything that can hand out a fresh snapshot of user commands
///
/// Called once per resolution so edits apply to the very next utterance.
pub trait CommandSource: Send + Sync {
    fn load_commands(&self, locale: &Locale) -> Result<Vec<CatalogueEntry>>;
}

impl CommandSource for Vec<CatalogueEntry> {
    fn load_commands(&self, locale: &Locale) -> Result<Vec<CatalogueEntry>> {
        Ok(self
            .iter()
            .filter(|e| e.locale.language() == locale.language())
            .cloned()
            .collect())
    }
}
