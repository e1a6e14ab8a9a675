mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::storage::{log_stored, PersistenceService};

/// SQLite-backed key/value store.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "feedback-desk")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("feedback-desk.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Key/value operations
    // ============================================================

    /// Insert or overwrite `key`. `created_at` is kept from the first write.
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        // Fixed-width timestamps so ORDER BY created_at is chronological.
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);

        conn.execute(
            "INSERT INTO kv_store (key, value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, &now),
        )?;

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Keys starting with `prefix`, oldest first.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT key FROM kv_store WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY created_at, key",
        )?;

        let keys = stmt
            .query_map([prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(keys)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

#[async_trait]
impl PersistenceService for Database {
    async fn set(&self, key: &str, value: &str, verbose: bool) -> bool {
        match self.set_value(key, value) {
            Ok(()) => {
                if verbose {
                    log_stored(key, value, "sqlite");
                }
                true
            }
            Err(e) => {
                tracing::error!("Failed to store {}: {}", key, e);
                false
            }
        }
    }
}
