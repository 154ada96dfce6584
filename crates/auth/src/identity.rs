//! Authenticated identity as seen by consumers.
//!
//! Identity resolution is owned by the external identity service; this crate
//! only exposes the *current* identity and a change notification. Session
//! management (sign-in, sign-out, token refresh) happens elsewhere.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use economia_core::UserId;

use crate::claims::JwtClaims;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl From<&JwtClaims> for Identity {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
        }
    }
}

/// Source of the current authenticated identity.
///
/// `current()` must be cheap and non-blocking: callers poll it.
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> Option<Identity>;
}

impl<P> IdentityProvider for std::sync::Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    fn current(&self) -> Option<Identity> {
        (**self).current()
    }
}

/// Identity provider backed by a `watch` channel.
///
/// The session layer pushes sign-in/sign-out transitions; consumers either
/// read `current()` or `subscribe()` to react to changes.
#[derive(Debug)]
pub struct WatchIdentityProvider {
    tx: watch::Sender<Option<Identity>>,
}

impl WatchIdentityProvider {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let (tx, _rx) = watch::channel(Some(identity));
        Self { tx }
    }

    pub fn sign_in(&self, identity: Identity) {
        tracing::info!(user_id = %identity.user_id, "identity resolved");
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        tracing::info!("identity cleared");
        self.tx.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

impl Default for WatchIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for WatchIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }
}
