//! SQLite storage for user-defined commands
//!
//! Manages `~/.hark/commands.db` with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use super::CommandSource;
use crate::config::Config;
use crate::domain::{CatalogueEntry, Locale};

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Shared handle to the command database
#[derive(Clone)]
pub struct CommandStore {
    conn: Arc<Mutex<Connection>>,
}

type RawRow = (i64, String, String, String, String);

impl CommandStore {
    /// Open or create the store at the default location (~/.hark/commands.db)
    pub fn open_default() -> Result<Self> {
        Self::open(&Config::global_config_dir().join("commands.db"))
    }

    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open command store: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn)
    }

    /// Throwaway store for tests and one-shot runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory command store")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Command store lock poisoned"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: commands carry their own locale
        if version < 2 {
            let has_locale: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('custom_commands') WHERE name = 'locale'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_locale {
                conn.execute_batch(
                    r#"
                    ALTER TABLE custom_commands ADD COLUMN locale TEXT NOT NULL DEFAULT 'en';
                    CREATE INDEX IF NOT EXISTS idx_command_locale ON custom_commands(locale);
                    "#,
                )?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (?1)", [SCHEMA_VERSION])?;
        }

        Ok(())
    }

    /// Store `entry`, replacing any command with the same normalized keyphrase
    ///
    /// Duplicates are looked up among commands of the same language, the scope
    /// `load_commands` builds snapshots from. Returns the id of the new row.
    pub fn insert(&self, entry: &CatalogueEntry) -> Result<i64> {
        let normalized = entry.normalized_keyphrase();
        let language = entry.locale.language();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let duplicates: Vec<i64> = {
            let mut stmt = tx.prepare("SELECT id, keyphrase, locale FROM custom_commands")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut ids = Vec::new();
            for row in rows {
                let (id, keyphrase, tag) = row?;
                if Locale::new(&tag).language() != language {
                    continue;
                }
                // Plain equality on normalized text; stored keyphrases are never treated as patterns
                if entry.locale.normalize(&keyphrase) == normalized {
                    ids.push(id);
                }
            }
            ids
        };

        for id in &duplicates {
            tx.execute("DELETE FROM custom_commands WHERE id = ?1", [id])?;
        }

        tx.execute(
            r#"
            INSERT INTO custom_commands (keyphrase, match_policy, payload, locale, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                entry.keyphrase.trim(),
                entry.policy.as_str(),
                entry.payload,
                entry.locale.tag(),
                chrono::Utc::now().timestamp_millis(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit().context("Failed to commit custom command")?;

        if duplicates.is_empty() {
            debug!("Stored custom command #{} \"{}\"", id, entry.keyphrase);
        } else {
            debug!(
                "Stored custom command #{} \"{}\", replacing {:?}",
                id, entry.keyphrase, duplicates
            );
        }
        Ok(id)
    }

    /// Every stored command, oldest first
    pub fn load_all(&self) -> Result<Vec<CatalogueEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, keyphrase, match_policy, payload, locale FROM custom_commands ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<rusqlite::Result<Vec<RawRow>>>()?;
        Ok(rows.into_iter().filter_map(into_entry).collect())
    }

    pub fn get(&self, id: i64) -> Result<Option<CatalogueEntry>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, keyphrase, match_policy, payload, locale FROM custom_commands WHERE id = ?1",
                [id],
                read_row,
            )
            .optional()?;
        Ok(row.and_then(into_entry))
    }

    /// Returns false if no command had this id
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM custom_commands WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Delete every command, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM custom_commands", [])?)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM custom_commands", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl CommandSource for CommandStore {
    fn load_commands(&self, locale: &Locale) -> Result<Vec<CatalogueEntry>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|e| e.locale.language() == locale.language())
            .collect())
    }
}

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn into_entry((id, keyphrase, policy, payload, locale): RawRow) -> Option<CatalogueEntry> {
    match policy.parse() {
        Ok(policy) => Some(CatalogueEntry {
            id,
            keyphrase,
            policy,
            payload,
            locale: Locale::new(locale),
        }),
        Err(e) => {
            warn!("Skipping custom command #{}: {}", id, e);
            None
        }
    }
}

/// SQL schema for the command store
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
INSERT OR IGNORE INTO schema_version VALUES (1);

-- User-defined commands (one row per keyphrase)
CREATE TABLE IF NOT EXISTS custom_commands (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyphrase TEXT NOT NULL,
    match_policy TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#;
