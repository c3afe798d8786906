//! Infrastructure layer: snapshot persistence and the application service
//! that keeps the inventory aggregate and its storage in step.

pub mod service;
pub mod snapshot_store;

pub use service::{AdjustMeta, InventoryService, ServiceError};
pub use snapshot_store::{
    InMemorySnapshotStore, InventorySnapshot, JsonFileStore, SnapshotStore, StoreError,
};
