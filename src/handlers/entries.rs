use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::StudentContext;
use crate::dto::{DeleteResponse, StudentEntryQuery};
use crate::error::AppResult;
use crate::models::draft::EntryDraft;
use crate::models::entry::JournalEntry;
use crate::services::journal;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(student): Extension<StudentContext>,
    Query(query): Query<StudentEntryQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let filter = query.into_filter(&student.student_id);
    let entries = journal::list_entries(state.store.as_ref(), &filter).await?;
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(student): Extension<StudentContext>,
    payload: Result<Json<EntryDraft>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JournalEntry>)> {
    let Json(mut body) = payload?;
    body.student_id = Some(student.student_id);
    let entry = journal::create_entry(state.store.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(student): Extension<StudentContext>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<JournalEntry>> {
    let entry =
        journal::fetch_entry(state.store.as_ref(), entry_id, Some(&student.student_id)).await?;
    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(student): Extension<StudentContext>,
    Path(entry_id): Path<Uuid>,
    payload: Result<Json<EntryDraft>, JsonRejection>,
) -> AppResult<Json<JournalEntry>> {
    let Json(body) = payload?;
    let entry = journal::update_entry(
        state.store.as_ref(),
        entry_id,
        Some(&student.student_id),
        body,
    )
    .await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(student): Extension<StudentContext>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    journal::delete_entry(state.store.as_ref(), entry_id, Some(&student.student_id)).await?;
    Ok(Json(DeleteResponse {
        deleted: true,
        id: entry_id,
    }))
}
