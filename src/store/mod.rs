//! Persistence for the reconciled history: a single slot holding the
//! serialized week list. The engine only ever needs `load` and `save`; the
//! trait keeps the reconciliation logic testable without a real backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::week::Week;

pub trait HistoryStore: Send + Sync {
    fn load(&self) -> AppResult<Vec<Week>>;
    fn save(&self, history: &[Week]) -> AppResult<()>;
}

/// History slot backed by one JSON file on disk. A missing file reads as an
/// empty history; corrupt content surfaces as `StorageRead` so the caller
/// can decide how to recover.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        info!(store_path = %path.display(), "initializing history store");
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> AppResult<Vec<Week>> {
        if !self.path.exists() {
            debug!(store_path = %self.path.display(), "history slot absent, starting empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|err| AppError::storage_read(err.to_string()))?;
        let history = serde_json::from_str(&contents)
            .map_err(|err| AppError::storage_read(err.to_string()))?;
        debug!(store_path = %self.path.display(), "history slot loaded");
        Ok(history)
    }

    fn save(&self, history: &[Week]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(history)?;
        fs::write(&self.path, json).map_err(|err| AppError::storage_write(err.to_string()))?;
        debug!(store_path = %self.path.display(), weeks = history.len(), "history slot saved");
        Ok(())
    }
}

/// In-memory slot holding the same serialized blob a browser local-storage
/// key would. Useful for tests and for embedding without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    slot: RwLock<Option<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with a raw serialized value, corrupt or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> AppResult<Vec<Week>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| AppError::storage_read("history slot lock poisoned"))?;
        match slot.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|err| AppError::storage_read(err.to_string()))
            }
        }
    }

    fn save(&self, history: &[Week]) -> AppResult<()> {
        let json = serde_json::to_string(history)?;
        let mut slot = self
            .slot
            .write()
            .map_err(|_| AppError::storage_write("history slot lock poisoned"))?;
        *slot = Some(json);
        Ok(())
    }
}
