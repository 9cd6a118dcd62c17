use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use chrono::Utc;

use crate::dto::AdminEntryQuery;
use crate::error::AppResult;
use crate::export::{self, PrintSurface, SurfaceBlocked};
use crate::services::journal;
use crate::AppState;

/// The HTTP response body is the display surface: it always opens.
#[derive(Default)]
struct ResponseSurface {
    document: String,
}

impl PrintSurface for ResponseSurface {
    fn present(&mut self, _title: &str, document: String) -> Result<(), SurfaceBlocked> {
        self.document = document;
        Ok(())
    }
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<AdminEntryQuery>,
) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let entries = journal::list_entries(state.store.as_ref(), &query.to_filter(today)).await?;
    let document = export::export_csv(&entries, &query.stem(today))?;

    tracing::info!(rows = entries.len(), filename = %document.filename, "CSV export served");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.content,
    ))
}

pub async fn export_printable(
    State(state): State<AppState>,
    Query(query): Query<AdminEntryQuery>,
) -> AppResult<Html<String>> {
    let now = Utc::now();
    let today = now.date_naive();
    let entries = journal::list_entries(state.store.as_ref(), &query.to_filter(today)).await?;

    let mut surface = ResponseSurface::default();
    export::export_printable(&entries, &query.stem(today), now, &mut surface)?;

    tracing::info!(rows = entries.len(), "printable export served");
    Ok(Html(surface.document))
}
