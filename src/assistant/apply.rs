//! Applying provider proposals to the workspace.
//!
//! A proposal names a `/`-delimited path and the full file content. It is
//! applied through the pure tree operations only: intermediate folders are
//! created as needed, an existing file at the path gets its content
//! replaced, a missing one is created. Sibling names are not unique in the
//! model, so path resolution takes the first matching child per segment.

use crate::tree::{FileNode, FolderNode, Node, WorkspaceTree};
use crate::types::NodeId;

/// A file the provider proposes to create or overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProposal {
    pub path: String,
    pub content: String,
}

/// Outcome of applying a proposal.
#[derive(Debug, Clone)]
pub struct AppliedProposal {
    pub tree: WorkspaceTree,
    pub file_id: NodeId,
    /// False when an existing file's content was replaced.
    pub created: bool,
}

/// Apply `proposal` to a snapshot, returning the new snapshot and the
/// affected file. `None` when the path has no usable segments.
pub fn apply_proposal(tree: &WorkspaceTree, proposal: &FileProposal) -> Option<AppliedProposal> {
    let segments: Vec<&str> = proposal
        .path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let (&file_name, folders) = segments.split_last()?;

    let mut tree = tree.clone();
    let mut parent_id = tree.root_id();
    for &segment in folders {
        match find_child_folder(&tree, parent_id, segment) {
            Some(existing) => parent_id = existing,
            None => {
                let folder = FolderNode::new(segment);
                let folder_id = folder.id;
                tree = tree.add_child(parent_id, folder);
                parent_id = folder_id;
            }
        }
    }

    match find_child_file(&tree, parent_id, file_name) {
        Some(file_id) => {
            tracing::debug!(path = %proposal.path, "replacing file content from proposal");
            Some(AppliedProposal {
                tree: tree.update_file_content(file_id, proposal.content.clone()),
                file_id,
                created: false,
            })
        }
        None => {
            let file = FileNode::new(file_name, proposal.content.clone());
            let file_id = file.id;
            tracing::debug!(path = %proposal.path, "creating file from proposal");
            Some(AppliedProposal {
                tree: tree.add_child(parent_id, file),
                file_id,
                created: true,
            })
        }
    }
}

fn children_of(tree: &WorkspaceTree, parent_id: NodeId) -> Option<&[Node]> {
    if parent_id == tree.root_id() {
        return Some(&tree.root().children);
    }
    match tree.find(parent_id) {
        Some(Node::Folder(folder)) => Some(&folder.children),
        _ => None,
    }
}

fn find_child_folder(tree: &WorkspaceTree, parent_id: NodeId, name: &str) -> Option<NodeId> {
    children_of(tree, parent_id)?
        .iter()
        .find_map(|child| match child {
            Node::Folder(folder) if folder.name == name => Some(folder.id),
            _ => None,
        })
}

fn find_child_file(tree: &WorkspaceTree, parent_id: NodeId, name: &str) -> Option<NodeId> {
    children_of(tree, parent_id)?
        .iter()
        .find_map(|child| match child {
            Node::File(file) if file.name == name => Some(file.id),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_workspace;
    use crate::tree::Node;

    #[test]
    fn proposal_creates_intermediate_folders() {
        let tree = default_workspace();
        let proposal = FileProposal {
            path: "scripts/spells/fireball.sk".to_string(),
            content: "on cast:\n    launch fireball\n".to_string(),
        };

        let applied = apply_proposal(&tree, &proposal).unwrap();
        assert!(applied.created);

        let paths: Vec<String> = super::super::prompt::file_paths(&applied.tree)
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert!(paths.contains(&"scripts/spells/fireball.sk".to_string()));
    }

    #[test]
    fn proposal_updates_existing_file_in_place() {
        let tree = default_workspace();
        let proposal = FileProposal {
            path: "scripts/main.sk".to_string(),
            content: "replaced".to_string(),
        };

        let applied = apply_proposal(&tree, &proposal).unwrap();
        assert!(!applied.created);
        // No duplicate main.sk appeared.
        assert_eq!(applied.tree.node_count(), tree.node_count());
        match applied.tree.find(applied.file_id) {
            Some(Node::File(file)) => assert_eq!(file.content, "replaced"),
            other => panic!("expected file node, got {:?}", other),
        }
    }

    #[test]
    fn empty_path_yields_none() {
        let tree = default_workspace();
        let proposal = FileProposal {
            path: " / / ".to_string(),
            content: String::new(),
        };
        assert!(apply_proposal(&tree, &proposal).is_none());
    }

    #[test]
    fn file_segment_does_not_shadow_folder_lookup() {
        // A file named "scripts" at root must not satisfy the folder
        // segment; a folder of the same name is used or created.
        let tree = default_workspace();
        let tree = tree.add_child(tree.root_id(), FileNode::new("scripts", "not a folder"));

        let proposal = FileProposal {
            path: "scripts/extra.sk".to_string(),
            content: String::new(),
        };
        let applied = apply_proposal(&tree, &proposal).unwrap();
        assert!(applied.created);

        let paths: Vec<String> = super::super::prompt::file_paths(&applied.tree)
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert!(paths.contains(&"scripts/extra.sk".to_string()));
    }

    #[test]
    fn input_snapshot_is_never_mutated() {
        let tree = default_workspace();
        let before = tree.clone();
        let proposal = FileProposal {
            path: "scripts/new.sk".to_string(),
            content: "x".to_string(),
        };

        apply_proposal(&tree, &proposal).unwrap();
        assert_eq!(tree, before);
    }
}
