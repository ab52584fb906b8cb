//! Local cache of generated artifacts
//!
//! Lookups and writes are best effort: a failing backend reads as a miss and
//! a failed write is only logged.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value store for generated artifacts (image data URLs)
pub trait ArtifactCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, value: &str);
}

/// Artifacts kept in a SQLite database
pub struct SqliteArtifactCache {
    conn: Mutex<Connection>,
}

impl SqliteArtifactCache {
    /// Open (or create) the cache database at the given path.
    pub fn open(db_path: PathBuf) -> Result<Self, CacheError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(&db_path)?)
    }

    fn init(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS artifacts (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn try_get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.query_row(
            "SELECT value FROM artifacts WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
    }

    fn try_put(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT OR REPLACE INTO artifacts (key, value, created_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl ArtifactCache for SqliteArtifactCache {
    fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("cache: lookup of {} failed, treating as miss: {}", key, e);
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) {
        if let Err(e) = self.try_put(key, value) {
            log::warn!("cache: failed to store {}: {}", key, e);
        }
    }
}

#[derive(Default)]
pub struct MemoryArtifactCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactCache for MemoryArtifactCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
}

/// Stand-in used when no cache could be opened: every lookup misses
pub struct NoCache;

impl ArtifactCache for NoCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: &str, _value: &str) {}
}
