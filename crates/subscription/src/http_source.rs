//! Client-side source that asks the service's `/subscription/check` endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use economia_core::UserId;

use crate::check::CheckResponse;
use crate::evaluator::evaluate;
use crate::record::SubscriptionRecord;
use crate::source::{SourceError, SubscriptionSource};
use crate::verdict::{AccessVerdict, ReasonCode};

/// Fetches the caller's record over HTTP with a bearer token.
///
/// The server's verdict is what the caller gets; the returned record is
/// re-evaluated with the local rule table only to log drift.
#[derive(Clone)]
pub struct HttpSubscriptionSource {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpSubscriptionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSubscriptionSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpSubscriptionSource {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn check(&self) -> Result<CheckResponse, SourceError> {
        let url = format!("{}/subscription/check", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        match res.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(SourceError::Unauthorized),
            other => return Err(SourceError::Unavailable(format!("{url} returned {other}"))),
        }

        res.json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}

/// Verdict carried by a check response. Reason codes this build does not
/// know never grant.
fn remote_verdict(body: &CheckResponse) -> AccessVerdict {
    if body.reason == ReasonCode::Error {
        return AccessVerdict::deny(ReasonCode::Error);
    }
    AccessVerdict {
        has_access: body.has_access,
        reason: body.reason.clone(),
    }
}

#[async_trait]
impl SubscriptionSource for HttpSubscriptionSource {
    async fn fetch(&self, _user: &UserId) -> Result<Option<SubscriptionRecord>, SourceError> {
        Ok(self.check().await?.to_record())
    }

    /// The service's verdict is authoritative; a local re-evaluation that
    /// disagrees is only logged.
    async fn verdict(&self, user: &UserId, now: DateTime<Utc>) -> Result<AccessVerdict, SourceError> {
        let body = self.check().await?;
        let remote = remote_verdict(&body);

        let local = evaluate(body.to_record().as_ref(), now);
        if local != remote {
            tracing::warn!(
                user_id = %user,
                remote_reason = %remote.reason,
                local_reason = %local.reason,
                "local and remote subscription verdicts differ"
            );
        }
        Ok(remote)
    }
}
