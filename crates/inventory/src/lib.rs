//! Inventory domain module.
//!
//! This crate contains business rules for warehouse items and their stock
//! movements, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage). Callers supply timestamps so every operation is
//! reproducible in tests.

pub mod inventory;
pub mod item;
pub mod movement;
pub mod payload;

pub use inventory::{ConsistencyError, Inventory, StockAdjustment};
pub use item::Item;
pub use movement::{Movement, MovementKind};
pub use payload::{ItemChanges, ItemPayload, NewItem};
