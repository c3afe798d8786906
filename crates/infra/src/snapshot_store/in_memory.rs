use std::io;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::r#trait::{InventorySnapshot, SnapshotStore, StoreError};

/// In-memory snapshot store.
///
/// Intended for tests/dev. Writes can be switched to fail to exercise
/// storage-error paths.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<InventorySnapshot>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: InventorySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<InventorySnapshot, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::io("<memory>", io::Error::other("snapshot lock poisoned")))?;
        Ok(snapshot.clone())
    }

    fn save(&self, snapshot: &InventorySnapshot) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io("<memory>", io::Error::other("simulated write failure")));
        }
        let mut current = self
            .snapshot
            .write()
            .map_err(|_| StoreError::io("<memory>", io::Error::other("snapshot lock poisoned")))?;
        *current = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
