//! Workspace Persistence
//!
//! Serialization of workspace trees to a single text blob, and the storage
//! port that persists that blob. Deserialization never fails the caller:
//! missing, unparseable, or structurally invalid payloads fall back to the
//! canonical starter workspace.

pub mod persistence;

use crate::error::StorageError;
use crate::tree::{FileNode, FolderNode, WorkspaceTree};
use std::collections::HashSet;

/// Starter script placed in every fresh workspace.
const STARTER_SCRIPT: &str = r#"# main.sk
# Entry point for your Skribe project.

on start:
    say "Hello from Skribe!"
"#;

/// The canonical default workspace: a root folder named `workspace`
/// containing `scripts/main.sk` with the starter script.
pub fn default_workspace() -> WorkspaceTree {
    let main = FileNode::new("main.sk", STARTER_SCRIPT);
    let scripts = FolderNode::with_children("scripts", vec![main.into()]);
    WorkspaceTree::new(FolderNode::with_children(
        "workspace",
        vec![scripts.into()],
    ))
}

/// Serialize a tree to its persisted text form.
pub fn serialize(tree: &WorkspaceTree) -> Result<String, StorageError> {
    serde_json::to_string(tree)
        .map_err(|e| StorageError::CorruptPayload(format!("serialize failed: {}", e)))
}

/// Deserialize a persisted payload, falling back to [`default_workspace`]
/// on any malformed or structurally invalid input.
pub fn deserialize(text: &str) -> WorkspaceTree {
    match serde_json::from_str::<WorkspaceTree>(text) {
        Ok(tree) if is_well_formed(&tree) => tree,
        Ok(_) => {
            tracing::warn!("persisted workspace has duplicate node ids, using default");
            default_workspace()
        }
        Err(e) => {
            tracing::warn!(error = %e, "persisted workspace is unparseable, using default");
            default_workspace()
        }
    }
}

/// Structural validity check applied after parsing: every id in the tree,
/// root included, must be unique.
fn is_well_formed(tree: &WorkspaceTree) -> bool {
    let mut seen = HashSet::new();
    seen.insert(tree.root_id());
    tree.iter().all(|node| seen.insert(node.id()))
}

/// Workspace store port: one text blob per workspace.
pub trait WorkspaceStore {
    /// Load the persisted payload, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist the payload, replacing any previous one.
    fn save(&self, payload: &str) -> Result<(), StorageError>;

    /// Load the workspace tree, applying the deserialization fallback.
    fn load_tree(&self) -> Result<WorkspaceTree, StorageError> {
        Ok(match self.load()? {
            Some(payload) => deserialize(&payload),
            None => default_workspace(),
        })
    }

    /// Serialize and persist a tree snapshot.
    fn save_tree(&self, tree: &WorkspaceTree) -> Result<(), StorageError> {
        self.save(&serialize(tree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_structure() {
        let tree = default_workspace();
        let text = serialize(&tree).unwrap();
        assert_eq!(deserialize(&text), tree);
    }

    #[test]
    fn empty_and_garbage_input_fall_back_to_default() {
        let fallback = deserialize("");
        assert_eq!(fallback.root().name, "workspace");

        let fallback = deserialize("{\"not\": \"a tree\"}");
        assert_eq!(fallback.root().name, "workspace");
    }

    #[test]
    fn duplicate_ids_fall_back_to_default() {
        let tree = default_workspace();
        let text = serialize(&tree).unwrap();
        // Duplicate the scripts folder wholesale: same ids twice.
        let scripts = serde_json::to_string(&tree.root().children[0]).unwrap();
        let doctored = text.replacen(&scripts, &format!("{},{}", scripts, scripts), 1);

        // The parsed payload would have had two `scripts` folders; the
        // fallback default has exactly one.
        let restored = deserialize(&doctored);
        assert_eq!(restored.root().name, "workspace");
        assert_eq!(restored.root().children.len(), 1);
        assert_eq!(restored.root().children[0].name(), "scripts");
    }
}
