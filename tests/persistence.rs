//! End-to-end persistence flow against the sled backend.

use skribe::concurrency::SharedWorkspace;
use skribe::store::persistence::SledWorkspaceStore;
use skribe::store::WorkspaceStore;
use skribe::tree::FileNode;
use tempfile::TempDir;

#[test]
fn fresh_store_hands_out_the_starter_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledWorkspaceStore::new(&temp_dir.path().join("store")).unwrap();

    let tree = store.load_tree().unwrap();
    assert_eq!(tree.root().name, "workspace");
    assert_eq!(tree.root().children[0].name(), "scripts");
}

#[test]
fn edits_survive_a_store_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");

    let file_id;
    {
        let store = SledWorkspaceStore::new(&store_path).unwrap();
        let shared = SharedWorkspace::new(store.load_tree().unwrap());

        let file = FileNode::new("level.sk", "on load:\n    build arena\n");
        file_id = file.id;
        let next = shared.update(|tree| tree.add_child(tree.root_id(), file.clone()));
        store.save_tree(&next).unwrap();
    }

    let store = SledWorkspaceStore::new(&store_path).unwrap();
    let tree = store.load_tree().unwrap();
    let file = tree.find(file_id).unwrap().as_file().unwrap();
    assert_eq!(file.name, "level.sk");
    assert_eq!(file.content, "on load:\n    build arena\n");
}

#[test]
fn corrupt_payload_degrades_to_the_starter_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");

    {
        let store = SledWorkspaceStore::new(&store_path).unwrap();
        store.save("definitely { not a workspace").unwrap();
    }

    let store = SledWorkspaceStore::new(&store_path).unwrap();
    let tree = store.load_tree().unwrap();
    assert_eq!(tree.root().name, "workspace");
}

#[test]
fn saving_a_snapshot_does_not_disturb_older_snapshots() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledWorkspaceStore::new(&temp_dir.path().join("store")).unwrap();

    let original = store.load_tree().unwrap();
    let edited = original.add_child(original.root_id(), FileNode::new("extra.sk", ""));
    store.save_tree(&edited).unwrap();

    // The older in-memory snapshot is still the pre-edit value.
    assert_eq!(original.root().children.len(), 1);
    assert_eq!(store.load_tree().unwrap(), edited);
}
