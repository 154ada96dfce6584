//! Errors shared by the pure (I/O-free) crates.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected input.
///
/// Only deterministic failures live here: bad amounts, empty names, calendar
/// months that do not exist, identifiers that do not parse. Lookups that
/// miss and remote failures have their own error types in the crates that
/// perform them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        assert_eq!(
            DomainError::validation("amount must be positive").to_string(),
            "validation failed: amount must be positive"
        );
        assert_eq!(
            DomainError::invalid_id("UserId: empty").to_string(),
            "invalid identifier: UserId: empty"
        );
    }
}
