//! The inventory aggregate: every item plus the append-only movement log.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use stockroom_core::entity::{find_by_id, position_of};
use stockroom_core::{DomainError, DomainResult, RecordId, Timestamp};

use crate::item::Item;
use crate::movement::{Movement, MovementKind};
use crate::payload::{ItemChanges, NewItem};

/// Result of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub item: Item,
    pub movement: Movement,
}

/// A loaded snapshot that breaks the aggregate's invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("duplicate item id {0}")]
    DuplicateItem(RecordId),

    #[error("duplicate movement id {0}")]
    DuplicateMovement(RecordId),

    #[error("movement {movement_id} references unknown item {item_id}")]
    DanglingMovement {
        movement_id: RecordId,
        item_id: RecordId,
    },

    #[error("item {item_id} has negative quantity {quantity}")]
    NegativeQuantity { item_id: RecordId, quantity: i64 },

    #[error("item {item_id} quantity {recorded} does not match movement total {derived}")]
    QuantityMismatch {
        item_id: RecordId,
        recorded: i64,
        derived: i64,
    },
}

/// Items and movements, in insertion order.
///
/// Invariants:
/// - every movement references an item held by the aggregate
/// - items and movements are never removed
/// - an item's quantity equals the sum of its movements' `quantity_change`
///   and is never negative
///
/// Operations validate before they mutate, so a failed call leaves the
/// aggregate untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
    movements: Vec<Movement>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts. Call [`Inventory::check_consistency`]
    /// before trusting the result.
    pub fn from_parts(items: Vec<Item>, movements: Vec<Movement>) -> Self {
        Self { items, movements }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// All items, ascending by SKU.
    pub fn list_items(&self) -> Vec<Item> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| a.sku().cmp(b.sku()));
        items
    }

    pub fn get_item(&self, id: &RecordId) -> DomainResult<&Item> {
        find_by_id(&self.items, id).ok_or_else(|| DomainError::not_found("item", id.as_str()))
    }

    /// Append a new item and its `initial` movement.
    pub fn create_item(&mut self, new: NewItem, now: Timestamp) -> Item {
        let item = Item::create(RecordId::generate(), new, now.clone());
        let movement = Movement::record(
            MovementKind::Initial,
            item.id().clone(),
            item.quantity(),
            Some(MovementKind::Initial.default_note().to_string()),
            now,
        );

        self.items.push(item.clone());
        self.movements.push(movement);
        item
    }

    /// Apply a validated partial update. Always refreshes `updated_at`.
    pub fn update_item(
        &mut self,
        id: &RecordId,
        changes: ItemChanges,
        now: Timestamp,
    ) -> DomainResult<Item> {
        let idx = self.index_of(id)?;
        let item = &mut self.items[idx];
        item.apply_changes(changes, now);
        Ok(item.clone())
    }

    /// Change an item's quantity by `delta` and record the movement.
    ///
    /// An empty or whitespace-only `reason` falls back to the default note for
    /// the movement kind.
    pub fn adjust_stock(
        &mut self,
        id: &RecordId,
        delta: i64,
        reason: Option<String>,
        now: Timestamp,
    ) -> DomainResult<StockAdjustment> {
        if delta == 0 {
            return Err(DomainError::field("delta", "delta cannot be zero"));
        }

        let idx = self.index_of(id)?;
        let current = self.items[idx].quantity();

        let new_quantity = match current.checked_add(delta) {
            Some(q) if q >= 0 => q,
            Some(_) => {
                let requested = delta.unsigned_abs();
                return Err(DomainError::field(
                    "delta",
                    format!("insufficient stock: {current} available, {requested} requested"),
                ));
            }
            None => return Err(DomainError::field("delta", "adjustment would overflow quantity")),
        };

        let kind = MovementKind::for_delta(delta);
        let note = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| kind.default_note().to_string());

        let item = &mut self.items[idx];
        item.set_quantity(new_quantity, now.clone());
        let item = item.clone();

        let movement = Movement::record(kind, id.clone(), delta, Some(note), now);
        self.movements.push(movement.clone());

        Ok(StockAdjustment { item, movement })
    }

    /// All movements, newest first. Movements sharing a timestamp are listed
    /// most recently recorded first.
    pub fn list_movements(&self) -> Vec<Movement> {
        newest_first(self.movements.iter())
    }

    /// Movement history of one item, newest first.
    pub fn movements_for_item(&self, id: &RecordId) -> DomainResult<Vec<Movement>> {
        self.index_of(id)?;
        Ok(newest_first(self.movements.iter().filter(|m| m.item_id() == id)))
    }

    /// Items at or below their reorder level, ascending by SKU.
    pub fn low_stock(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.items.iter().filter(|i| i.needs_reorder()).cloned().collect();
        items.sort_by(|a, b| a.sku().cmp(b.sku()));
        items
    }

    /// Verify referential integrity and that cached quantities match the
    /// movement log.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let mut totals: HashMap<&RecordId, i64> = HashMap::with_capacity(self.items.len());
        for item in &self.items {
            if totals.insert(item.id(), 0).is_some() {
                return Err(ConsistencyError::DuplicateItem(item.id().clone()));
            }
        }

        let mut seen = HashSet::with_capacity(self.movements.len());
        for movement in &self.movements {
            if !seen.insert(movement.id()) {
                return Err(ConsistencyError::DuplicateMovement(movement.id().clone()));
            }
            match totals.get_mut(movement.item_id()) {
                Some(total) => *total = total.saturating_add(movement.quantity_change()),
                None => {
                    return Err(ConsistencyError::DanglingMovement {
                        movement_id: movement.id().clone(),
                        item_id: movement.item_id().clone(),
                    });
                }
            }
        }

        for item in &self.items {
            if item.quantity() < 0 {
                return Err(ConsistencyError::NegativeQuantity {
                    item_id: item.id().clone(),
                    quantity: item.quantity(),
                });
            }
            let derived = totals[item.id()];
            if derived != item.quantity() {
                return Err(ConsistencyError::QuantityMismatch {
                    item_id: item.id().clone(),
                    recorded: item.quantity(),
                    derived,
                });
            }
        }

        Ok(())
    }

    fn index_of(&self, id: &RecordId) -> DomainResult<usize> {
        position_of(&self.items, id).ok_or_else(|| DomainError::not_found("item", id.as_str()))
    }
}

fn newest_first<'a>(movements: impl DoubleEndedIterator<Item = &'a Movement>) -> Vec<Movement> {
    // Reverse first so the stable sort keeps later insertions ahead on ties.
    let mut out: Vec<Movement> = movements.rev().cloned().collect();
    out.sort_by(|a, b| b.created_at().cmp(a.created_at()));
    out
}
