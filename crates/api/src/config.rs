//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration as StdDuration;

use economia_subscription::GuardConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a socket address, got {value:?}")]
    InvalidAddr { key: &'static str, value: String },

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Shared secret of the billing platform; billing updates are refused
    /// when unset.
    pub billing_secret: Option<String>,
    pub guard: GuardConfig,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("billing_secret", &self.billing_secret.as_ref().map(|_| "<redacted>"))
            .field("guard", &self.guard)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError::InvalidAddr {
            key: "BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let billing_secret = lookup("BILLING_SECRET").filter(|s| !s.is_empty());
        if billing_secret.is_none() {
            tracing::warn!("BILLING_SECRET not set; billing updates are disabled");
        }

        let mut guard = GuardConfig::default();
        if let Some(secs) = positive_secs(&lookup, "SUBSCRIPTION_CACHE_TTL_SECS")? {
            guard = guard.with_cache_ttl(chrono::Duration::seconds(secs as i64));
        }
        if let Some(secs) = positive_secs(&lookup, "SUBSCRIPTION_REMOTE_TIMEOUT_SECS")? {
            guard = guard.with_remote_timeout(StdDuration::from_secs(secs));
        }

        Ok(Self {
            bind_addr,
            jwt_secret,
            billing_secret,
            guard,
        })
    }
}

fn positive_secs<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(u64::from(n))),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}
