use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use economia_auth::JwtValidator;
use economia_subscription::{AccessVerifier, Redirect, denial_message};

use crate::app::errors::json_error;
use crate::context::{AccessContext, IdentityContext};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(IdentityContext::from(&claims));

    Ok(next.run(req).await)
}

/// Lets the request through only when the caller's subscription grants
/// access. Denials (including lookup failures) answer `402` with the
/// redirect the client should follow.
pub async fn subscription_gate(
    State(verifier): State<Arc<AccessVerifier>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(identity) = req.extensions().get::<IdentityContext>().cloned() else {
        return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing identity");
    };

    let verdict = verifier.verify_or_deny(identity.user_id()).await;
    if !verdict.has_access {
        let reason = verdict.reason;
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "error": "subscription_required",
                "message": denial_message(&reason),
                "reason": reason.code(),
                "redirect": Redirect::plan_selection(reason),
            })),
        )
            .into_response();
    }

    req.extensions_mut().insert(AccessContext::new(verdict));
    next.run(req).await
}

/// Header carrying the billing platform's shared secret.
pub const BILLING_SECRET_HEADER: &str = "x-billing-secret";

#[derive(Clone)]
pub struct BillingState {
    pub secret: Option<Arc<str>>,
}

/// Admits only the billing platform. User tokens carry no weight here.
pub async fn billing_middleware(
    State(state): State<BillingState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.secret.as_deref() else {
        tracing::warn!("billing update refused, no billing secret configured");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = req
        .headers()
        .get(BILLING_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !secrets_match(presented.as_bytes(), expected.as_bytes()) {
        tracing::warn!("billing update refused, bad billing secret");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}

/// Comparison whose duration does not depend on where the inputs differ.
fn secrets_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok("abc.def"));
    }

    #[test]
    fn malformed_authorization_is_unauthorized() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(extract_bearer(&headers("Basic Zm9v")), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(extract_bearer(&headers("Bearer   ")), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn billing_secret_must_match_exactly() {
        assert!(secrets_match(b"whsec_1", b"whsec_1"));
        assert!(!secrets_match(b"whsec_1", b"whsec_2"));
        assert!(!secrets_match(b"whsec", b"whsec_1"));
        assert!(!secrets_match(b"", b"whsec_1"));
    }
}
