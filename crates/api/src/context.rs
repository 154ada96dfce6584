use economia_auth::{Identity, JwtClaims};
use economia_core::UserId;
use economia_subscription::AccessVerdict;

/// Authenticated identity for a request, derived from the bearer token.
///
/// Present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: Identity,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> &UserId {
        &self.identity.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.email.as_deref()
    }
}

impl From<&JwtClaims> for IdentityContext {
    fn from(claims: &JwtClaims) -> Self {
        Self::new(Identity::from(claims))
    }
}

/// Verdict that let the request through the subscription gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    verdict: AccessVerdict,
}

impl AccessContext {
    pub fn new(verdict: AccessVerdict) -> Self {
        Self { verdict }
    }

    pub fn verdict(&self) -> &AccessVerdict {
        &self.verdict
    }
}
