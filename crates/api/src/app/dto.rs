use serde::{Deserialize, Serialize};
use serde_json::json;

use stockroom_infra::AdjustMeta;
use stockroom_inventory::StockAdjustment;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items/:id/adjust`.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

impl AdjustStockRequest {
    pub fn meta(&self) -> AdjustMeta {
        AdjustMeta {
            reason: self.reason.clone(),
        }
    }
}

// -------------------------
// Response envelopes
// -------------------------

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> axum::Json<Data<T>> {
    axum::Json(Data { data })
}

pub fn adjustment_to_json(adj: StockAdjustment) -> serde_json::Value {
    json!({
        "item": adj.item,
        "movement": adj.movement,
    })
}
