//! Workspace archive export.
//!
//! Walks a snapshot and writes a gzip-compressed tar archive. The root
//! folder's own name is not an entry path segment: its children sit at
//! archive root. Folders become directory entries so empty ones survive
//! the round trip.

use crate::error::StorageError;
use crate::tree::Node;
use crate::tree::WorkspaceTree;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Write `tree` as a `.tar.gz` archive into `writer`.
pub fn export_archive<W: Write>(tree: &WorkspaceTree, writer: W) -> Result<(), StorageError> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for child in &tree.root().children {
        append_node(&mut tar, child, "")?;
    }

    tar.finish()?;
    Ok(())
}

fn append_node<W: Write>(
    tar: &mut tar::Builder<W>,
    node: &Node,
    prefix: &str,
) -> Result<(), StorageError> {
    let name = sanitize_entry_name(node.name());
    let path = if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    };
    match node {
        Node::File(file) => {
            let mut header = tar::Header::new_gnu();
            header.set_size(file.content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append_data(&mut header, &path, file.content.as_bytes())?;
        }
        Node::Folder(folder) => {
            let mut header = tar::Header::new_gnu();
            header.set_size(0);
            header.set_mode(0o755);
            header.set_entry_type(tar::EntryType::Directory);
            header.set_cksum();
            tar.append_data(&mut header, format!("{}/", path), std::io::empty())?;
            for child in &folder.children {
                append_node(tar, child, &path)?;
            }
        }
    }
    Ok(())
}

/// Node names are display strings; keep them safe as archive path segments.
fn sanitize_entry_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_workspace;
    use crate::tree::{FileNode, FolderNode};

    #[test]
    fn archive_starts_with_gzip_magic() {
        let mut buf = Vec::new();
        export_archive(&default_workspace(), &mut buf).unwrap();

        assert!(!buf.is_empty());
        assert_eq!(buf[0], 0x1f);
        assert_eq!(buf[1], 0x8b);
    }

    #[test]
    fn entries_omit_root_name_and_keep_empty_folders() {
        let tree = default_workspace();
        let tree = tree.add_child(tree.root_id(), FolderNode::new("assets"));

        let mut buf = Vec::new();
        export_archive(&tree, &mut buf).unwrap();

        let decoder = flate2::read::GzDecoder::new(buf.as_slice());
        let mut archive = tar::Archive::new(decoder);
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| {
                e.unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert!(names.contains(&"scripts/".to_string()));
        assert!(names.contains(&"scripts/main.sk".to_string()));
        assert!(names.contains(&"assets/".to_string()));
        assert!(names.iter().all(|n| !n.starts_with("workspace")));
    }

    #[test]
    fn file_content_survives_the_archive() {
        let file = FileNode::new("a.sk", "content here");
        let tree = default_workspace();
        let tree = tree.add_child(tree.root_id(), file);

        let mut buf = Vec::new();
        export_archive(&tree, &mut buf).unwrap();

        let decoder = flate2::read::GzDecoder::new(buf.as_slice());
        let mut archive = tar::Archive::new(decoder);
        let mut found = false;
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().to_string_lossy() == "a.sk" {
                let mut content = String::new();
                std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
                assert_eq!(content, "content here");
                found = true;
            }
        }
        assert!(found);
    }

    #[test]
    fn hostile_names_are_sanitized() {
        assert_eq!(sanitize_entry_name("a/b"), "a_b");
        assert_eq!(sanitize_entry_name("..\\up"), ".._up");
        assert_eq!(sanitize_entry_name(""), "_");
    }
}
