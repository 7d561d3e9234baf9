//! Concurrent access to the current workspace snapshot.
//!
//! Tree values are immutable, so readers holding different snapshots never
//! observe interference. The single shared mutable resource is the "current
//! tree" slot; no lock is held across anything longer than the swap itself.

use crate::tree::WorkspaceTree;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared slot holding the latest workspace snapshot.
///
/// Cloning the handle shares the slot. `snapshot` hands out an owned copy
/// of the current value; `replace` and `update` swap in a new one.
#[derive(Clone)]
pub struct SharedWorkspace {
    current: Arc<RwLock<WorkspaceTree>>,
}

impl SharedWorkspace {
    pub fn new(tree: WorkspaceTree) -> Self {
        Self {
            current: Arc::new(RwLock::new(tree)),
        }
    }

    /// Owned copy of the current snapshot.
    pub fn snapshot(&self) -> WorkspaceTree {
        self.current.read().clone()
    }

    /// Swap in `tree` as the new current snapshot.
    pub fn replace(&self, tree: WorkspaceTree) {
        *self.current.write() = tree;
    }

    /// Apply a pure operation to the current snapshot and swap in its
    /// result. Read-modify-write is atomic: the write lock is held across
    /// the operation so concurrent updates cannot lose each other.
    pub fn update<F>(&self, op: F) -> WorkspaceTree
    where
        F: FnOnce(&WorkspaceTree) -> WorkspaceTree,
    {
        let mut guard = self.current.write();
        let next = op(&guard);
        *guard = next.clone();
        next
    }
}
