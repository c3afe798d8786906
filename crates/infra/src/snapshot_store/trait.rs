use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_inventory::{ConsistencyError, Inventory, Item, Movement};

/// Persisted document: `{"items": [...], "movements": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: Vec<Item>,
    pub movements: Vec<Movement>,
}

impl InventorySnapshot {
    /// Rebuild the aggregate, rejecting snapshots that break its invariants.
    pub fn into_inventory(self) -> Result<Inventory, StoreError> {
        let inventory = Inventory::from_parts(self.items, self.movements);
        inventory.check_consistency()?;
        Ok(inventory)
    }
}

impl From<&Inventory> for InventorySnapshot {
    fn from(inventory: &Inventory) -> Self {
        Self {
            items: inventory.items().to_vec(),
            movements: inventory.movements().to_vec(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt store file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(#[from] ConsistencyError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Snapshot persistence boundary.
pub trait SnapshotStore: Send + Sync {
    /// Load the most recently saved snapshot.
    fn load(&self) -> Result<InventorySnapshot, StoreError>;

    /// Replace the stored snapshot. Must be atomic for concurrent readers.
    fn save(&self, snapshot: &InventorySnapshot) -> Result<(), StoreError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<InventorySnapshot, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &InventorySnapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}
