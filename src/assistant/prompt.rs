//! Prompt and context construction owned by the assistant domain.

use crate::tree::{Node, WorkspaceTree};

/// System instruction for the scripting assistant, including the reply
/// contract [`super::service`] parses: a `path:` line naming the file,
/// followed by one fenced code block with the full file content.
pub fn system_prompt() -> String {
    "You are the build assistant inside a Skribe scripting workspace. \
     Skribe scripts live in .sk files. Answer questions about the project \
     directly. When the user asks you to create or change a file, reply \
     with a line of the form `path: <folder/file.sk>` followed by exactly \
     one fenced code block containing the complete file content."
        .to_string()
}

/// Indented structure listing of the workspace. The root folder's own name
/// is omitted; folders carry a trailing slash.
pub fn structure_listing(tree: &WorkspaceTree) -> String {
    let mut out = String::new();
    for child in &tree.root().children {
        push_listing(child, 0, &mut out);
    }
    out
}

fn push_listing(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    match node {
        Node::File(file) => {
            out.push_str(&file.name);
            out.push('\n');
        }
        Node::Folder(folder) => {
            out.push_str(&folder.name);
            out.push_str("/\n");
            for child in &folder.children {
                push_listing(child, depth + 1, out);
            }
        }
    }
}

/// Every file in the tree as `(slash-joined path, content)`, pre-order.
/// The root folder's name is not a path segment.
pub fn file_paths(tree: &WorkspaceTree) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for child in &tree.root().children {
        collect_paths(child, "", &mut out);
    }
    out
}

fn collect_paths(node: &Node, prefix: &str, out: &mut Vec<(String, String)>) {
    let path = if prefix.is_empty() {
        node.name().to_string()
    } else {
        format!("{}/{}", prefix, node.name())
    };
    match node {
        Node::File(file) => out.push((path, file.content.clone())),
        Node::Folder(folder) => {
            for child in &folder.children {
                collect_paths(child, &path, out);
            }
        }
    }
}

/// Project context handed to the provider: structure listing plus a
/// per-file content dump with path headers.
pub fn project_context(tree: &WorkspaceTree) -> String {
    let mut out = String::from("Project structure:\n");
    out.push_str(&structure_listing(tree));
    out.push_str("\nFiles:\n");
    for (path, content) in file_paths(tree) {
        out.push_str(&format!("--- {} ---\n{}\n", path, content));
        if !content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
