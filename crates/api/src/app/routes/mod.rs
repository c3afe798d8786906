use axum::{routing::get, Router};

pub mod items;
pub mod movements;
pub mod reports;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/items", items::router())
        .nest("/movements", movements::router())
        .nest("/reports", reports::router())
}
