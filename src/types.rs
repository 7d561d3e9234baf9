//! Core types for the Skribe workspace engine.

/// NodeId: Opaque, globally unique identifier of a workspace node.
///
/// Minted once at node creation and never reused or changed.
pub type NodeId = uuid::Uuid;

/// Mint a fresh NodeId, distinct from every previously minted id.
pub fn new_node_id() -> NodeId {
    uuid::Uuid::new_v4()
}
