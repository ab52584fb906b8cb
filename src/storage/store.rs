//! Durable storage for the application state
//!
//! The whole state is a single JSON record under a fixed key:
//! ```text
//! {data_dir}/
//! └── {storage_key}.json
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;

use super::state::AppState;

/// Storage key of the state record
pub const STORAGE_KEY: &str = "wordgarden_v3";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A place the full application state can be read from and written to
pub trait StateStore: Send {
    /// Read the stored state, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<AppState>>;

    /// Replace the stored state
    fn save(&self, state: &AppState) -> Result<()>;

    /// Move an unreadable record out of the way so a fresh state can be saved
    /// without destroying it. Returns where the old record went, if anywhere.
    fn set_aside(&self) -> Result<Option<String>>;
}

/// State stored as a pretty-printed JSON file
pub struct JsonFileStore {
    base_path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self::with_key(base_path, STORAGE_KEY)
    }

    pub fn with_key(base_path: PathBuf, key: &str) -> Self {
        Self {
            base_path,
            key: key.to_string(),
        }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("wordgarden"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Path of the state file
    pub fn state_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.json", self.key))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<AppState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let state: AppState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.state_path(), serde_json::to_string_pretty(state)?)?;
        Ok(())
    }

    fn set_aside(&self) -> Result<Option<String>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }

        let backup = self.base_path.join(format!(
            "{}.json.corrupt-{}",
            self.key,
            Utc::now().format("%Y%m%d%H%M%S%3f")
        ));
        fs::rename(&path, &backup)?;
        log::warn!("storage: moved unreadable state to {}", backup.display());
        Ok(Some(backup.display().to_string()))
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and inspect what a session wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Default)]
struct MemorySlot {
    json: Option<String>,
    set_aside: Option<String>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw JSON, as if written by an earlier version
    pub fn with_json(json: &str) -> Self {
        let store = Self::default();
        store.lock().json = Some(json.to_string());
        store
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    /// Make every following save fail
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Record moved away by the last `set_aside`
    pub fn set_aside_json(&self) -> Option<String> {
        self.lock().set_aside.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        // A poisoned slot still holds valid data
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<AppState>> {
        match self.lock().json.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let mut slot = self.lock();
        if slot.fail_saves {
            return Err(StorageError::Unavailable("memory store set to fail".to_string()));
        }
        slot.json = Some(json);
        slot.saves += 1;
        Ok(())
    }

    fn set_aside(&self) -> Result<Option<String>> {
        let mut slot = self.lock();
        match slot.json.take() {
            Some(json) => {
                slot.set_aside = Some(json);
                Ok(Some("memory".to_string()))
            }
            None => Ok(None),
        }
    }
}
