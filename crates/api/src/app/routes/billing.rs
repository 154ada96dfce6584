//! Endpoints called by the billing platform, not by subscribers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::put,
    Json, Router,
};

use economia_core::UserId;
use economia_subscription::{CheckResponse, SubscriptionUpdate};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/billing/subscriptions/:user_id", put(apply_update))
}

/// Replace a user's subscription record with the billing platform's view.
pub async fn apply_update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    Json(update): Json<SubscriptionUpdate>,
) -> axum::response::Response {
    let user = match UserId::parse(user_id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let record = services.lifecycle.apply_update(&user, update);
    let resp = CheckResponse::from_record(Some(&record), services.clock.now());
    (StatusCode::OK, Json(resp)).into_response()
}
