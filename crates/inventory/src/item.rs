use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, RecordId, Timestamp};

use crate::payload::{ItemChanges, NewItem};

/// A tracked warehouse stock-keeping unit.
///
/// `quantity` is a cached value: it always equals the sum of the
/// `quantity_change` of every movement recorded for the item, and it can only
/// be changed through [`crate::Inventory::adjust_stock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: RecordId,
    name: String,
    sku: String,
    location: String,
    quantity: i64,
    reorder_level: Option<i64>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Item {
    pub(crate) fn create(id: RecordId, new: NewItem, now: Timestamp) -> Self {
        Self {
            id,
            name: new.name,
            sku: new.sku,
            location: new.location,
            quantity: new.quantity,
            reorder_level: new.reorder_level,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reorder_level(&self) -> Option<i64> {
        self.reorder_level
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// True when a reorder level is set and stock has dropped to or below it.
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level.is_some_and(|level| self.quantity <= level)
    }

    /// Apply the fields present in `changes`; absent fields keep their value.
    pub(crate) fn apply_changes(&mut self, changes: ItemChanges, now: Timestamp) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(reorder_level) = changes.reorder_level {
            self.reorder_level = reorder_level;
        }
        self.updated_at = now;
    }

    /// Caller guarantees `quantity >= 0`.
    pub(crate) fn set_quantity(&mut self, quantity: i64, now: Timestamp) {
        debug_assert!(quantity >= 0);
        self.quantity = quantity;
        self.updated_at = now;
    }
}

impl Entity for Item {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
