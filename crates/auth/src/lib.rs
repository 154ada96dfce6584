//! `economia-auth`: authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it verifies
//! bearer tokens and exposes the current identity, nothing more.

pub mod claims;
pub mod identity;
pub mod jwt;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use identity::{Identity, IdentityProvider, WatchIdentityProvider};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
