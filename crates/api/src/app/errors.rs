use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(DomainError::Validation(errors)) => {
            tracing::warn!(%errors, "validation failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({
                    "error": "Validation failed",
                    "details": errors,
                })),
            )
                .into_response()
        }
        ServiceError::Domain(e @ DomainError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, e.to_string())
        }
        e @ (ServiceError::Storage(_) | ServiceError::Poisoned) => {
            tracing::error!(error = %e, "inventory operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Body could not be decoded into the expected shape.
pub fn rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "Invalid JSON payload",
            "details": { "body": rejection.body_text() },
        })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
