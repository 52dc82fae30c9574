use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// ISO-8601 capture time.
    pub timestamp: String,
}

/// One summarized exchange handed to the memory subsystem. The orchestrator
/// drops its reference once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub category: String,
    pub content: String,
    /// 0.0 to 1.0.
    pub importance: f32,
    pub metadata: EntryMetadata,
}

/// Long-term conversation memory. Both calls may fail; callers treat failure
/// as a degraded turn, never as a fatal condition.
pub trait MemoryStore: Send {
    fn store(&mut self, entry: MemoryEntry) -> Result<(), MemoryError>;
    /// Flush to durable storage. Called once at shutdown.
    fn save(&mut self) -> Result<(), MemoryError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    id: String,
    #[serde(flatten)]
    entry: MemoryEntry,
}

/// File-backed store: a JSON snapshot at `store_path` plus an append-only
/// JSONL log of every conversation entry under `log_dir`.
pub struct FileMemoryStore {
    store_path: PathBuf,
    log_path: PathBuf,
    entries: Vec<StoredEntry>,
}

impl FileMemoryStore {
    pub fn open(store_path: PathBuf, log_dir: PathBuf) -> Result<Self, MemoryError> {
        fs::create_dir_all(&log_dir)?;
        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = if store_path.exists() {
            let content = fs::read_to_string(&store_path)?;
            serde_json::from_str(&content)
                .map_err(|e| MemoryError::Serialization(e.to_string()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            log_path: log_dir.join("conversations.jsonl"),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MemoryStore for FileMemoryStore {
    fn store(&mut self, entry: MemoryEntry) -> Result<(), MemoryError> {
        let stored = StoredEntry {
            id: Uuid::new_v4().to_string(),
            entry,
        };

        // The log line goes out immediately; the snapshot waits for save().
        let line = serde_json::to_string(&stored)
            .map_err(|e| MemoryError::Serialization(e.to_string()))?;
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(log, "{}", line)?;

        self.entries.push(stored);
        Ok(())
    }

    fn save(&mut self) -> Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| MemoryError::Serialization(e.to_string()))?;
        fs::write(&self.store_path, json)?;
        Ok(())
    }
}
