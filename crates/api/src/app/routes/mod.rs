use axum::{
    routing::{get, post},
    Router,
};

pub mod billing;
pub mod finance;
pub mod subscription;
pub mod system;

/// Router for all authenticated endpoints that do not need a subscription.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/subscription/check", post(subscription::check))
        .route("/subscription/refresh", post(subscription::refresh))
        .route("/subscription/trial", post(subscription::start_trial))
        .route("/subscription/cancel", post(subscription::cancel))
}

/// Router for endpoints behind the subscription gate.
pub fn gated_router() -> Router {
    Router::new().nest("/finance", finance::router())
}
