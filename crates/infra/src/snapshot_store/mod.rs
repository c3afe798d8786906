//! Durable storage of the whole inventory as one snapshot document.
//!
//! The store is deliberately coarse: every mutation rewrites the full
//! snapshot. Implementations must make a save atomic from a reader's point of
//! view (no half-written documents).

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemorySnapshotStore;
pub use json_file::JsonFileStore;
pub use r#trait::{InventorySnapshot, SnapshotStore, StoreError};
