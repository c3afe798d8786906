use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::app::{dto, errors, SharedInventory};

pub fn router() -> Router {
    Router::new().route("/", get(list_movements))
}

/// Every recorded movement, newest first.
pub async fn list_movements(
    Extension(services): Extension<SharedInventory>,
) -> axum::response::Response {
    match services.list_movements() {
        Ok(movements) => (StatusCode::OK, dto::data(movements)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
