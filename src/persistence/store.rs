use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::config::MemoryConfig;
use crate::modules::memory::decay::rank_and_truncate;
use crate::modules::memory::{MemoryEntry, MemoryStore};
use crate::modules::participant::Participant;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read-through / write-through profile and memory storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_all_profiles(&self) -> Result<Vec<Participant>, PersistenceError>;

    async fn get_player_memory(&self, participant_id: &str) -> Result<Vec<MemoryEntry>, PersistenceError>;

    async fn add_memory_entry(&self, participant_id: &str, entry: &MemoryEntry) -> Result<(), PersistenceError>;
}

/// Directory-backed store: `profiles.json` plus `memories/<hex participant id>.json`.
/// Each memory file holds at most `max_entries` ranked entries.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    max_entries: usize,
}

const PROFILES_FILE: &str = "profiles.json";
const MEMORIES_DIR: &str = "memories";

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_entries: MemoryConfig::default().max_entries_per_participant,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.root.join(PROFILES_FILE)
    }

    /// Hex keeps distinct ids on distinct files whatever characters they use.
    pub fn memory_path(&self, participant_id: &str) -> PathBuf {
        self.root
            .join(MEMORIES_DIR)
            .join(format!("{}.json", hex::encode(participant_id.as_bytes())))
    }

    pub async fn save_profiles(&self, profiles: &[Participant]) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(profiles)?;
        fs::write(self.profiles_path(), json).await?;
        Ok(())
    }

    async fn read_memory_file(&self, path: &Path) -> Result<Vec<MemoryEntry>, PersistenceError> {
        match fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn get_all_profiles(&self) -> Result<Vec<Participant>, PersistenceError> {
        let path = self.profiles_path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn get_player_memory(&self, participant_id: &str) -> Result<Vec<MemoryEntry>, PersistenceError> {
        self.read_memory_file(&self.memory_path(participant_id)).await
    }

    async fn add_memory_entry(&self, participant_id: &str, entry: &MemoryEntry) -> Result<(), PersistenceError> {
        let path = self.memory_path(participant_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut entries = self.read_memory_file(&path).await?;
        entries.push(entry.clone());
        rank_and_truncate(&mut entries, MemoryStore::now_ms(), self.max_entries);
        fs::write(&path, serde_json::to_string_pretty(&entries)?).await?;

        debug!(participant_id, count = entries.len(), "Memory entry persisted");
        Ok(())
    }
}
