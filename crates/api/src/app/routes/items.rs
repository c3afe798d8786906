use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockroom_infra::ServiceError;
use stockroom_inventory::ItemPayload;

use crate::app::{dto, errors, SharedInventory};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).patch(update_item).put(update_item))
        .route("/:id/adjust", post(adjust_stock))
        .route("/:id/movements", get(item_movements))
}

pub async fn list_items(Extension(services): Extension<SharedInventory>) -> axum::response::Response {
    match services.list_items() {
        Ok(items) => (StatusCode::OK, dto::data(items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<SharedInventory>,
    body: Result<Json<ItemPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match blocking(services, move |svc| svc.create_item(payload)).await {
        Ok(item) => (StatusCode::CREATED, dto::data(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<SharedInventory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.get_item(&id) {
        Ok(item) => (StatusCode::OK, dto::data(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<SharedInventory>,
    Path(id): Path<String>,
    body: Result<Json<ItemPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match blocking(services, move |svc| svc.update_item(&id, payload)).await {
        Ok(item) => (StatusCode::OK, dto::data(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<SharedInventory>,
    Path(id): Path<String>,
    body: Result<Json<dto::AdjustStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    let meta = body.meta();
    match blocking(services, move |svc| svc.adjust_stock(&id, body.delta, meta)).await {
        Ok(adj) => (StatusCode::OK, dto::data(dto::adjustment_to_json(adj))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn item_movements(
    Extension(services): Extension<SharedInventory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.item_movements(&id) {
        Ok(movements) => (StatusCode::OK, dto::data(movements)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Mutations hold the state lock across an fsync and rename, so they run on
/// the blocking pool instead of an async worker.
async fn blocking<T, F>(services: SharedInventory, call: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce(&SharedInventory) -> Result<T, ServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&services)).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "inventory mutation task failed");
            Err(ServiceError::Poisoned)
        }
    }
}
