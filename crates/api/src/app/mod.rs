//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: subscription and finance services shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and path parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router with default timings and empty stores.
///
/// Billing updates stay disabled; use [`build_app_from_config`] with a
/// billing secret to accept them.
pub fn build_app(jwt_secret: String) -> Router {
    build_app_with(jwt_secret, None, Arc::new(AppServices::default()))
}

pub fn build_app_from_config(config: &ApiConfig) -> Router {
    build_app_with(
        config.jwt_secret.clone(),
        config.billing_secret.clone(),
        Arc::new(AppServices::new(&config.guard)),
    )
}

/// Build the router over existing services (tests seed records this way).
pub fn build_app_with(
    jwt_secret: String,
    billing_secret: Option<String>,
    services: Arc<AppServices>,
) -> Router {
    let jwt = Arc::new(economia_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };
    let billing_state = middleware::BillingState {
        secret: billing_secret.map(Arc::from),
    };

    // Billing platform only: shared secret, no user token.
    let billing = routes::billing::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                billing_state,
                middleware::billing_middleware,
            ))
            .layer(Extension(services.clone())),
    );

    // Finance routes additionally require a subscription that grants access.
    let gated = routes::gated_router().layer(axum::middleware::from_fn_with_state(
        services.verifier.clone(),
        middleware::subscription_gate,
    ));

    // Protected routes: require a valid bearer token.
    let protected = routes::router().merge(gated).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(billing)
        .merge(protected)
}
