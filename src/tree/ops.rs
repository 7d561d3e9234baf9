//! Pure structural operations on the workspace tree.
//!
//! Every operation takes a snapshot by reference and returns a new snapshot;
//! the input is never mutated, so prior snapshots held by tabs, undo stacks,
//! or persisted state stay valid. Invalid input (unknown id, type mismatch,
//! cycle attempt, self-move) degrades to a no-op that still returns a valid
//! tree; callers are expected to pre-validate user gestures.

use super::{FolderNode, Node, NodeIter};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Placement of a dragged node relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    /// Append as the last child of a folder target.
    Inside,
    /// Insert as a sibling immediately before the target.
    Before,
    /// Insert as a sibling immediately after the target.
    After,
}

/// The workspace document: a distinguished root folder and everything
/// reachable from it. The root itself is never replaced, removed, or
/// renamed; only its subtree changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceTree {
    root: FolderNode,
}

impl WorkspaceTree {
    pub fn new(root: FolderNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    /// Pre-order iterator over every node below the root.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter::over_children(&self.root.children)
    }

    /// Depth-first pre-order lookup by id. The root is not a [`Node`] value
    /// and is addressed through [`WorkspaceTree::root`] instead.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.iter().find(|node| node.id() == id)
    }

    /// Whether `id` names the root or any node below it.
    pub fn contains(&self, id: NodeId) -> bool {
        self.root.id == id || self.find(id).is_some()
    }

    /// Total node count, root included.
    pub fn node_count(&self) -> usize {
        1 + self.iter().count()
    }

    /// Replace a file's content. No-op on a folder id or an unknown id.
    pub fn update_file_content(&self, id: NodeId, content: impl Into<String>) -> Self {
        let mut next = self.clone();
        if let Some(Node::File(file)) = find_mut(&mut next.root, id) {
            file.content = content.into();
        }
        next
    }

    /// Append `child` to the folder named by `parent_id` (the root id is a
    /// valid parent). No-op if the parent is a file or unknown. The caller
    /// guarantees `child` carries a globally fresh id; constructors do.
    pub fn add_child(&self, parent_id: NodeId, child: impl Into<Node>) -> Self {
        let mut next = self.clone();
        if parent_id == next.root.id {
            next.root.children.push(child.into());
            return next;
        }
        if let Some(Node::Folder(folder)) = find_mut(&mut next.root, parent_id) {
            folder.children.push(child.into());
        }
        next
    }

    /// Remove the node named by `id` together with its whole subtree,
    /// wherever it sits. No-op on an unknown id and on the root id.
    pub fn remove_node(&self, id: NodeId) -> Self {
        let mut next = self.clone();
        if id == next.root.id {
            return next;
        }
        strip(&mut next.root, id);
        next
    }

    /// Rename a node. Sibling names are not required to be unique, so no
    /// collision check happens here. No-op on an unknown id and on the root.
    pub fn rename_node(&self, id: NodeId, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        if id == next.root.id {
            return next;
        }
        if let Some(node) = find_mut(&mut next.root, id) {
            node.set_name(name);
        }
        next
    }

    /// Reparent or reorder `source_id` relative to `target_id`.
    ///
    /// Degrades to a no-op when: source and target are the same node, either
    /// id is unknown, the source is the root, the target sits inside the
    /// source's own subtree (cycle guard), `Inside` targets a file, or
    /// `Before`/`After` target the root (which has no siblings).
    ///
    /// Sibling insertion recomputes the target's index *after* the source
    /// has been detached; detaching an earlier sibling shifts every later
    /// index left by one, and computing against the pre-removal index would
    /// misplace the node.
    pub fn move_node(&self, source_id: NodeId, target_id: NodeId, position: DropPosition) -> Self {
        if source_id == target_id || source_id == self.root.id {
            return self.clone();
        }
        let source = match self.find(source_id) {
            Some(node) => node,
            None => return self.clone(),
        };
        // Cycle guard: a folder may never land inside its own subtree.
        if let Node::Folder(folder) = source {
            if folder.subtree_contains(target_id) {
                return self.clone();
            }
        }
        match position {
            DropPosition::Inside => {
                let target_is_folder = target_id == self.root.id
                    || matches!(self.find(target_id), Some(Node::Folder(_)));
                if !target_is_folder {
                    return self.clone();
                }
            }
            DropPosition::Before | DropPosition::After => {
                if target_id == self.root.id || self.find(target_id).is_none() {
                    return self.clone();
                }
            }
        }

        let mut next = self.clone();
        let detached = match detach(&mut next.root, source_id) {
            Some(node) => node,
            None => return next,
        };
        match position {
            DropPosition::Inside => {
                if target_id == next.root.id {
                    next.root.children.push(detached);
                } else if let Some(Node::Folder(folder)) = find_mut(&mut next.root, target_id) {
                    folder.children.push(detached);
                }
            }
            DropPosition::Before | DropPosition::After => {
                // The target cannot have been detached along with the
                // source: the cycle guard rejected targets inside the
                // source subtree.
                if let Some((siblings, index)) = locate_children_mut(&mut next.root, target_id) {
                    let offset = usize::from(position == DropPosition::After);
                    siblings.insert(index + offset, detached);
                }
            }
        }
        next
    }
}

/// Mutable pre-order lookup below `folder`.
fn find_mut(folder: &mut FolderNode, id: NodeId) -> Option<&mut Node> {
    for child in folder.children.iter_mut() {
        if child.id() == id {
            return Some(child);
        }
        if let Node::Folder(inner) = child {
            if let Some(found) = find_mut(inner, id) {
                return Some(found);
            }
        }
    }
    None
}

/// The child list containing `id`, plus the index of `id` within it.
fn locate_children_mut(folder: &mut FolderNode, id: NodeId) -> Option<(&mut Vec<Node>, usize)> {
    if let Some(index) = folder.children.iter().position(|c| c.id() == id) {
        return Some((&mut folder.children, index));
    }
    for child in folder.children.iter_mut() {
        if let Node::Folder(inner) = child {
            if let Some(found) = locate_children_mut(inner, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Splice the node named by `id` out of whichever child list holds it.
fn detach(folder: &mut FolderNode, id: NodeId) -> Option<Node> {
    if let Some(index) = folder.children.iter().position(|c| c.id() == id) {
        return Some(folder.children.remove(index));
    }
    for child in folder.children.iter_mut() {
        if let Node::Folder(inner) = child {
            if let Some(node) = detach(inner, id) {
                return Some(node);
            }
        }
    }
    None
}

/// Filter `id` out of every child list at every depth. Ids are unique, so
/// at most one node (and its subtree) disappears.
fn strip(folder: &mut FolderNode, id: NodeId) {
    folder.children.retain(|child| child.id() != id);
    for child in folder.children.iter_mut() {
        if let Node::Folder(inner) = child {
            strip(inner, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileNode;

    fn tree_with(children: Vec<Node>) -> WorkspaceTree {
        WorkspaceTree::new(FolderNode::with_children("workspace", children))
    }

    #[test]
    fn update_file_content_leaves_prior_snapshot_intact() {
        let file = FileNode::new("a.sk", "one");
        let file_id = file.id;
        let tree = tree_with(vec![file.into()]);

        let updated = tree.update_file_content(file_id, "two");

        assert_eq!(tree.find(file_id).unwrap().as_file().unwrap().content, "one");
        assert_eq!(
            updated.find(file_id).unwrap().as_file().unwrap().content,
            "two"
        );
    }

    #[test]
    fn update_on_folder_id_is_noop() {
        let folder = FolderNode::new("scripts");
        let folder_id = folder.id;
        let tree = tree_with(vec![folder.into()]);

        let next = tree.update_file_content(folder_id, "nope");
        assert_eq!(next, tree);
    }

    #[test]
    fn add_child_to_root_appends_at_end() {
        let first = FileNode::new("a.sk", "");
        let tree = tree_with(vec![first.into()]);

        let next = tree.add_child(tree.root_id(), FileNode::new("b.sk", ""));
        let names: Vec<&str> = next.root().children.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a.sk", "b.sk"]);
    }

    #[test]
    fn add_child_to_file_is_noop() {
        let file = FileNode::new("a.sk", "");
        let file_id = file.id;
        let tree = tree_with(vec![file.into()]);

        let next = tree.add_child(file_id, FileNode::new("b.sk", ""));
        assert_eq!(next, tree);
    }

    #[test]
    fn remove_root_is_noop() {
        let tree = tree_with(vec![FileNode::new("a.sk", "").into()]);
        let next = tree.remove_node(tree.root_id());
        assert_eq!(next, tree);
    }

    #[test]
    fn rename_does_not_enforce_sibling_uniqueness() {
        let a = FileNode::new("a.sk", "");
        let b = FileNode::new("b.sk", "");
        let b_id = b.id;
        let tree = tree_with(vec![a.into(), b.into()]);

        let next = tree.rename_node(b_id, "a.sk");
        let names: Vec<&str> = next.root().children.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a.sk", "a.sk"]);
    }

    #[test]
    fn move_after_earlier_sibling_compensates_for_removal_shift() {
        let a = FileNode::new("a.sk", "");
        let b = FileNode::new("b.sk", "");
        let (a_id, b_id) = (a.id, b.id);
        let tree = tree_with(vec![a.into(), b.into()]);

        let next = tree.move_node(a_id, b_id, DropPosition::After);
        let names: Vec<&str> = next.root().children.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["b.sk", "a.sk"]);
    }

    #[test]
    fn move_before_earlier_sibling_keeps_relative_order() {
        let a = FileNode::new("a.sk", "");
        let b = FileNode::new("b.sk", "");
        let (a_id, b_id) = (a.id, b.id);
        let tree = tree_with(vec![a.into(), b.into()]);

        let next = tree.move_node(a_id, b_id, DropPosition::Before);
        let names: Vec<&str> = next.root().children.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a.sk", "b.sk"]);
    }

    #[test]
    fn move_inside_own_descendant_is_rejected() {
        let inner = FolderNode::new("B");
        let inner_id = inner.id;
        let outer = FolderNode::with_children("A", vec![inner.into()]);
        let outer_id = outer.id;
        let tree = tree_with(vec![outer.into()]);

        let next = tree.move_node(outer_id, inner_id, DropPosition::Inside);
        assert_eq!(next, tree);
    }

    #[test]
    fn move_inside_file_target_is_noop() {
        let folder = FolderNode::new("A");
        let file = FileNode::new("x.sk", "");
        let (folder_id, file_id) = (folder.id, file.id);
        let tree = tree_with(vec![folder.into(), file.into()]);

        let next = tree.move_node(folder_id, file_id, DropPosition::Inside);
        assert_eq!(next, tree);
    }

    #[test]
    fn move_inside_root_reparents_to_root_level() {
        let file = FileNode::new("x.sk", "");
        let file_id = file.id;
        let folder = FolderNode::with_children("A", vec![file.into()]);
        let tree = tree_with(vec![folder.into()]);

        let next = tree.move_node(file_id, tree.root_id(), DropPosition::Inside);
        assert_eq!(next.root().children.len(), 2);
        assert_eq!(next.root().children[1].id(), file_id);
    }
}
