use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use economia_core::DomainError;
use economia_finance::FinanceError;
use economia_subscription::{LifecycleError, SourceError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn finance_error_to_response(err: FinanceError) -> axum::response::Response {
    match err {
        FinanceError::Domain(e) => domain_error_to_response(e),
        e @ FinanceError::EntryNotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
    }
}

pub fn lifecycle_error_to_response(err: LifecycleError) -> axum::response::Response {
    match err {
        e @ LifecycleError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
        e @ LifecycleError::AlreadySubscribed(_) => {
            json_error(StatusCode::CONFLICT, "already_subscribed", e.to_string())
        }
    }
}

pub fn source_error_to_response(err: SourceError) -> axum::response::Response {
    tracing::error!(error = %err, "subscription source failed");
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "subscription_unavailable",
        err.to_string(),
    )
}
