//! Item payload validation.
//!
//! Payloads arrive as raw JSON objects so that "key absent", "key present but
//! null" and "wrong JSON type" stay distinguishable. Every applicable field is
//! checked and all problems are reported together in one [`FieldErrors`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stockroom_core::{DomainError, DomainResult, FieldErrors};

/// Raw create/update payload for an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPayload(Map<String, Value>);

/// Validated input for creating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub location: String,
    pub quantity: i64,
    pub reorder_level: Option<i64>,
}

/// Validated partial update. `None` means "keep the existing value".
///
/// `reorder_level` is doubly optional: `Some(None)` clears the level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub location: Option<String>,
    pub reorder_level: Option<Option<i64>>,
}

const TEXT_FIELDS: [&str; 3] = ["name", "sku", "location"];

impl ItemPayload {
    /// Validate for item creation.
    pub fn into_new_item(self) -> DomainResult<NewItem> {
        let mut errors = FieldErrors::new();

        let [name, sku, location] = TEXT_FIELDS.map(|field| match self.0.get(field) {
            None => {
                errors.insert(field, format!("{field} is required"));
                None
            }
            Some(value) => non_empty_string(field, value, &mut errors),
        });

        let quantity = match self.0.get("quantity") {
            None => {
                errors.insert("quantity", "quantity is required");
                None
            }
            Some(value) => non_negative_integer("quantity", value, &mut errors),
        };

        let reorder_level = self.reorder_level(&mut errors);

        errors.into_result()?;

        // Every `None` above recorded an error, so these are all present.
        match (name, sku, location, quantity) {
            (Some(name), Some(sku), Some(location), Some(quantity)) => Ok(NewItem {
                name,
                sku,
                location,
                quantity,
                reorder_level: reorder_level.flatten(),
            }),
            _ => Err(DomainError::field("payload", "payload is incomplete")),
        }
    }

    /// Validate for a partial update. `quantity` is rejected; it only changes
    /// through stock adjustments.
    pub fn into_changes(self) -> DomainResult<ItemChanges> {
        let mut errors = FieldErrors::new();

        if self.0.contains_key("quantity") {
            errors.insert(
                "quantity",
                "quantity cannot be updated directly; use a stock adjustment",
            );
        }

        let [name, sku, location] = TEXT_FIELDS.map(|field| {
            self.0
                .get(field)
                .and_then(|value| non_empty_string(field, value, &mut errors))
        });

        let reorder_level = self.reorder_level(&mut errors);

        errors.into_result()?;

        Ok(ItemChanges {
            name,
            sku,
            location,
            reorder_level,
        })
    }

    /// `None` = key absent, `Some(None)` = explicit null.
    fn reorder_level(&self, errors: &mut FieldErrors) -> Option<Option<i64>> {
        match self.0.get("reorder_level") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(value) => non_negative_integer("reorder_level", value, errors).map(Some),
        }
    }
}

impl TryFrom<Value> for ItemPayload {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(DomainError::field("payload", "payload must be a JSON object")),
        }
    }
}

fn non_empty_string(field: &str, value: &Value, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) => {
            errors.insert(field, format!("{field} must not be empty"));
            None
        }
        _ => {
            errors.insert(field, format!("{field} must be a non-empty string"));
            None
        }
    }
}

fn non_negative_integer(field: &str, value: &Value, errors: &mut FieldErrors) -> Option<i64> {
    match value.as_i64() {
        Some(n) if n >= 0 => Some(n),
        Some(_) => {
            errors.insert(field, format!("{field} must be greater than or equal to 0"));
            None
        }
        None if value.as_u64().is_some() => {
            errors.insert(field, format!("{field} is too large"));
            None
        }
        None => {
            errors.insert(field, format!("{field} must be an integer"));
            None
        }
    }
}
