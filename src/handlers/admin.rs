use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::dto::AdminEntryQuery;
use crate::error::AppResult;
use crate::models::entry::JournalEntry;
use crate::models::filter::ValidationPatch;
use crate::services::journal;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<AdminEntryQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let filter = query.to_filter(Utc::now().date_naive());
    let entries = journal::list_entries(state.store.as_ref(), &filter).await?;
    Ok(Json(entries))
}

pub async fn set_validation(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    payload: Result<Json<ValidationPatch>, JsonRejection>,
) -> AppResult<Json<JournalEntry>> {
    let Json(patch) = payload?;
    let entry = journal::set_validation(state.store.as_ref(), entry_id, patch).await?;
    Ok(Json(entry))
}
