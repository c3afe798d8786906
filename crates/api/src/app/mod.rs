//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: opens the inventory store and builds the shared service
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and response envelopes
//! - `errors.rs`: consistent error responses

use axum::{middleware::map_response, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::SharedInventory;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: SharedInventory) -> Router {
    routes::router()
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(map_response(middleware::json_method_not_allowed))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_log))
                .layer(CorsLayer::permissive()),
        )
}
