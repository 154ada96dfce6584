use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use economia_core::EntryId;
use economia_finance::{EntryKind, Granularity};

use crate::app::errors;
use crate::context::IdentityContext;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    pub kind: Option<EntryKind>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodsQuery {
    #[serde(default)]
    pub granularity: Granularity,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<&IdentityContext> for WhoAmI {
    fn from(ctx: &IdentityContext) -> Self {
        Self {
            user_id: ctx.user_id().to_string(),
            email: ctx.email().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

// -------------------------
// Path parsing
// -------------------------

pub fn parse_entry_id(raw: &str) -> Result<EntryId, axum::response::Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, axum::response::Response> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_date",
            "date must be formatted as YYYY-MM-DD",
        )
    })
}
