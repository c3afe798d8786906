//! Inventory application service.
//!
//! Owns the in-memory [`Inventory`] for the lifetime of the process and keeps
//! it in sync with a [`SnapshotStore`]:
//!
//! ```text
//! request
//!   ↓
//! 1. Validate payload (no lock held, nothing mutated on failure)
//!   ↓
//! 2. Lock state, apply the change to a copy of the aggregate
//!   ↓
//! 3. Save the full snapshot
//!   ↓
//! 4. Swap the copy in and return the affected records
//! ```
//!
//! Step 4 only runs after a successful save, so a storage failure leaves both
//! memory and disk at the previous state. Reads never touch the store.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{error, info};

use stockroom_core::{DomainError, DomainResult, RecordId, Timestamp};
use stockroom_inventory::{Inventory, Item, ItemPayload, Movement, StockAdjustment};

use crate::snapshot_store::{InventorySnapshot, SnapshotStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation or not-found; expected at the boundary.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Reading or writing the snapshot failed.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    /// A previous request panicked while holding the state lock.
    #[error("inventory state lock poisoned")]
    Poisoned,
}

/// Optional metadata attached to a stock adjustment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustMeta {
    pub reason: Option<String>,
}

impl AdjustMeta {
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

pub struct InventoryService<S> {
    store: S,
    state: Mutex<Inventory>,
}

impl<S> core::fmt::Debug for InventoryService<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryService").finish_non_exhaustive()
    }
}

impl<S: SnapshotStore> InventoryService<S> {
    /// Load the snapshot once and verify it before serving requests.
    pub fn open(store: S) -> Result<Self, ServiceError> {
        let inventory = store.load()?.into_inventory()?;
        info!(
            items = inventory.items().len(),
            movements = inventory.movements().len(),
            "inventory loaded"
        );
        Ok(Self {
            store,
            state: Mutex::new(inventory),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All items, ascending by SKU.
    pub fn list_items(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.state()?.list_items())
    }

    pub fn get_item(&self, id: &str) -> Result<Item, ServiceError> {
        let id = parse_item_id(id)?;
        Ok(self.state()?.get_item(&id)?.clone())
    }

    pub fn create_item(&self, payload: ItemPayload) -> Result<Item, ServiceError> {
        let new = payload.into_new_item()?;
        let item = self.mutate(|inv| Ok(inv.create_item(new, Timestamp::now())))?;
        info!(item_id = %item.id(), sku = item.sku(), quantity = item.quantity(), "item created");
        Ok(item)
    }

    pub fn update_item(&self, id: &str, payload: ItemPayload) -> Result<Item, ServiceError> {
        let changes = payload.into_changes()?;
        let id = parse_item_id(id)?;
        let item = self.mutate(|inv| inv.update_item(&id, changes, Timestamp::now()))?;
        info!(item_id = %item.id(), "item updated");
        Ok(item)
    }

    pub fn adjust_stock(
        &self,
        id: &str,
        delta: i64,
        meta: AdjustMeta,
    ) -> Result<StockAdjustment, ServiceError> {
        if delta == 0 {
            return Err(DomainError::field("delta", "delta cannot be zero").into());
        }
        let id = parse_item_id(id)?;
        let adjustment =
            self.mutate(|inv| inv.adjust_stock(&id, delta, meta.reason, Timestamp::now()))?;
        info!(
            item_id = %adjustment.item.id(),
            delta,
            quantity = adjustment.item.quantity(),
            kind = %adjustment.movement.kind(),
            "stock adjusted"
        );
        Ok(adjustment)
    }

    /// All movements, newest first.
    pub fn list_movements(&self) -> Result<Vec<Movement>, ServiceError> {
        Ok(self.state()?.list_movements())
    }

    /// Movement history of one item, newest first.
    pub fn item_movements(&self, id: &str) -> Result<Vec<Movement>, ServiceError> {
        let id = parse_item_id(id)?;
        Ok(self.state()?.movements_for_item(&id)?)
    }

    /// Items at or below their reorder level.
    pub fn low_stock(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.state()?.low_stock())
    }

    fn state(&self) -> Result<MutexGuard<'_, Inventory>, ServiceError> {
        self.state.lock().map_err(|_| ServiceError::Poisoned)
    }

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Inventory) -> DomainResult<T>,
    ) -> Result<T, ServiceError> {
        let mut state = self.state()?;
        let mut next = state.clone();
        let out = change(&mut next)?;

        if let Err(e) = self.store.save(&InventorySnapshot::from(&next)) {
            error!(error = %e, "failed to persist inventory; change discarded");
            return Err(e.into());
        }

        *state = next;
        Ok(out)
    }
}

/// An id that cannot be parsed cannot name an existing item.
fn parse_item_id(id: &str) -> Result<RecordId, DomainError> {
    id.parse().map_err(|_| DomainError::not_found("item", id))
}
