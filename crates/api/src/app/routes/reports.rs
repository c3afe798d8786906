use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::app::{dto, errors, SharedInventory};

pub fn router() -> Router {
    Router::new().route("/low-stock", get(low_stock))
}

/// Items whose quantity has reached their reorder level.
pub async fn low_stock(Extension(services): Extension<SharedInventory>) -> axum::response::Response {
    match services.low_stock() {
        Ok(items) => (StatusCode::OK, dto::data(items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
