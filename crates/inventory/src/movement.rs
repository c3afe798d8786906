use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, RecordId, Timestamp};

/// Note attached to the movement recorded when an item is created.
pub const INITIAL_NOTE: &str = "Initial stock level";
/// Default note for a positive adjustment without a reason.
pub const INBOUND_NOTE: &str = "Restock";
/// Default note for a negative adjustment without a reason.
pub const OUTBOUND_NOTE: &str = "Dispatch";

/// Kind of stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock level recorded when the item was created.
    Initial,
    /// Positive adjustment.
    Inbound,
    /// Negative adjustment.
    Outbound,
}

impl MovementKind {
    /// Kind for a non-zero adjustment delta.
    pub fn for_delta(delta: i64) -> Self {
        if delta > 0 { Self::Inbound } else { Self::Outbound }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Initial => "initial",
            MovementKind::Inbound => "inbound",
            MovementKind::Outbound => "outbound",
        }
    }

    /// Note used when the caller did not give a reason.
    pub fn default_note(&self) -> &'static str {
        match self {
            MovementKind::Initial => INITIAL_NOTE,
            MovementKind::Inbound => INBOUND_NOTE,
            MovementKind::Outbound => OUTBOUND_NOTE,
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable log entry describing a quantity change applied to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    id: RecordId,
    #[serde(rename = "type")]
    kind: MovementKind,
    item_id: RecordId,
    quantity_change: i64,
    note: Option<String>,
    created_at: Timestamp,
}

impl Movement {
    pub(crate) fn record(
        kind: MovementKind,
        item_id: RecordId,
        quantity_change: i64,
        note: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            kind,
            item_id,
            quantity_change,
            note,
            created_at: now,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn item_id(&self) -> &RecordId {
        &self.item_id
    }

    pub fn quantity_change(&self) -> i64 {
        self.quantity_change
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

impl Entity for Movement {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
