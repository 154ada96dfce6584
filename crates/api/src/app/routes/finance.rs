use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use economia_finance::{
    EntryEdit, NewEntry, breakdown, calendar_month, day_detail, group_by_period, month_summary,
    totals,
};

use crate::app::dto::{self, Items, ListEntriesQuery, PeriodsQuery};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/:id", put(edit_entry).delete(delete_entry))
        .route("/summary", get(summary))
        .route("/days/:date", get(day))
        .route("/calendar/:year/:month", get(calendar))
        .route("/months/:year/:month", get(month))
        .route("/periods", get(periods))
        .route("/breakdown", get(pie_breakdown))
}

pub async fn list_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Query(query): Query<ListEntriesQuery>,
) -> axum::response::Response {
    let items = match query.kind {
        Some(kind) => services.book.entries_of_kind(identity.user_id(), kind),
        None => services.book.entries(identity.user_id()),
    };
    (StatusCode::OK, Json(Items::from(items))).into_response()
}

pub async fn create_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<NewEntry>,
) -> axum::response::Response {
    match services.book.add(identity.user_id(), body) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => errors::finance_error_to_response(e),
    }
}

pub async fn edit_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(body): Json<EntryEdit>,
) -> axum::response::Response {
    let id = match dto::parse_entry_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.book.edit(identity.user_id(), id, body) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => errors::finance_error_to_response(e),
    }
}

pub async fn delete_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_entry_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.book.remove(identity.user_id(), id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::finance_error_to_response(e),
    }
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let entries = services.book.entries(identity.user_id());
    (StatusCode::OK, Json(totals(&entries))).into_response()
}

pub async fn day(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(date): Path<String>,
) -> axum::response::Response {
    let date = match dto::parse_date(&date) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let entries = services.book.entries(identity.user_id());
    (StatusCode::OK, Json(day_detail(&entries, date))).into_response()
}

pub async fn calendar(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let entries = services.book.entries(identity.user_id());
    match calendar_month(&entries, year, month, services.book.today()) {
        Ok(cal) => (StatusCode::OK, Json(cal)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn month(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let entries = services.book.entries(identity.user_id());
    match month_summary(&entries, year, month) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn periods(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Query(query): Query<PeriodsQuery>,
) -> axum::response::Response {
    let entries = services.book.entries(identity.user_id());
    let items = group_by_period(&entries, query.granularity);
    (StatusCode::OK, Json(Items::from(items))).into_response()
}

pub async fn pie_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let entries = services.book.entries(identity.user_id());
    (StatusCode::OK, Json(breakdown(&entries))).into_response()
}
