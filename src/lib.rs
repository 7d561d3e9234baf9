//! Skribe: Workspace Engine for the Skribe Scripting IDE
//!
//! An immutable, persistent workspace tree (files and folders) with pure
//! structural operations, plus the orchestration layers that consume tree
//! snapshots: persistence, assistant-driven mutation, and archive export.

pub mod assistant;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod provider;
pub mod store;
pub mod tree;
pub mod types;
