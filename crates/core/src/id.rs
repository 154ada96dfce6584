//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length of an identity-provider user id.
pub const MAX_USER_ID_LEN: usize = 128;

/// Identifier of a user, as issued by the external identity provider.
///
/// Provider ids are opaque strings (not UUIDs), so this wraps a validated
/// `String`: non-empty, no surrounding whitespace, no path separators, at most
/// [`MAX_USER_ID_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::invalid_id("UserId: empty"));
        }
        if raw.len() > MAX_USER_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "UserId: longer than {MAX_USER_ID_LEN} bytes"
            )));
        }
        if raw.trim() != raw {
            return Err(DomainError::invalid_id("UserId: surrounding whitespace"));
        }
        if raw.contains('/') {
            return Err(DomainError::invalid_id("UserId: contains '/'"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Identifier of a finance entry (income or expense line).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(EntryId, "EntryId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_provider_style_ids() {
        let id = UserId::parse("cqkSpOnpGmTZANfbU6PAI6tawSu1").unwrap();
        assert_eq!(id.as_str(), "cqkSpOnpGmTZANfbU6PAI6tawSu1");
        assert_eq!(id.to_string(), "cqkSpOnpGmTZANfbU6PAI6tawSu1");
    }

    #[test]
    fn user_id_rejects_malformed_values() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse(" abc").is_err());
        assert!(UserId::parse("users/abc").is_err());
        assert!(UserId::parse("x".repeat(MAX_USER_ID_LEN + 1)).is_err());
    }

    #[test]
    fn user_id_deserialization_validates() {
        let ok: UserId = serde_json::from_str(r#""u-1""#).unwrap();
        assert_eq!(ok.as_str(), "u-1");
        assert!(serde_json::from_str::<UserId>(r#""""#).is_err());
    }

    #[test]
    fn entry_id_parse_error_names_the_type() {
        let err = "not-a-uuid".parse::<EntryId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("EntryId")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
