//! Workspace store backends.
//!
//! `SledWorkspaceStore` keeps the workspace blob under a fixed key in a
//! sled database; `MemoryWorkspaceStore` holds it in process memory for
//! tests and ephemeral sessions.

use super::WorkspaceStore;
use crate::error::StorageError;
use parking_lot::RwLock;
use std::path::Path;

/// Key the serialized workspace lives under.
const TREE_KEY: &str = "workspace/tree";

/// Sled-backed workspace store.
pub struct SledWorkspaceStore {
    db: sled::Db,
}

impl SledWorkspaceStore {
    /// Open (or create) the store at `path`.
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl WorkspaceStore for SledWorkspaceStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match self.db.get(TREE_KEY)? {
            Some(bytes) => {
                let payload = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    StorageError::CorruptPayload("workspace blob is not UTF-8".to_string())
                })?;
                tracing::debug!(bytes = payload.len(), "loaded workspace payload");
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        self.db.insert(TREE_KEY, payload.as_bytes())?;
        self.db.flush()?;
        tracing::debug!(bytes = payload.len(), "saved workspace payload");
        Ok(())
    }
}

/// In-memory workspace store.
#[derive(Default)]
pub struct MemoryWorkspaceStore {
    slot: RwLock<Option<String>>,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkspaceStore for MemoryWorkspaceStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        *self.slot.write() = Some(payload.to_string());
        Ok(())
    }
}
