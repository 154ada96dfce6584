use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use economia_subscription::{CheckResponse, check_subscription};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::IdentityContext;

/// Authoritative check straight from the record store (no cache).
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let now = services.clock.now();
    match check_subscription(services.records.as_ref(), identity.user_id(), now).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => errors::source_error_to_response(e),
    }
}

/// Drop the caller's cached verdict (e.g. after returning from billing).
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> StatusCode {
    services.verifier.invalidate(identity.user_id());
    StatusCode::NO_CONTENT
}

pub async fn start_trial(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let now = services.clock.now();
    match services.lifecycle.start_trial(identity.user_id(), now) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(CheckResponse::from_record(Some(&record), now)),
        )
            .into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    match services.lifecycle.cancel(identity.user_id()) {
        Ok(record) => {
            let resp = CheckResponse::from_record(Some(&record), services.clock.now());
            (StatusCode::OK, Json(resp)).into_response()
        }
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
