//! # Jurnal API: request/response DTOs
//!
//! Conventions:
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Entry bodies use the model types directly (`EntryDraft` in,
//!   `JournalEntry` out), camelCase on the wire

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::entry::Habit;
use crate::models::filter::{EntryFilter, ValidationState};

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

/// Stable error envelope; every error response uses this shape
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Student entries
// ============================================================================

/// GET /api/entries
#[derive(Debug, Default, Deserialize)]
pub struct StudentEntryQuery {
    pub date: Option<NaiveDate>,
    pub habit: Option<Habit>,
}

impl StudentEntryQuery {
    pub fn into_filter(self, student_id: &str) -> EntryFilter {
        let filter = EntryFilter::for_student(student_id).with_habit(self.habit);
        match self.date {
            Some(date) => filter.on_date(date),
            None => filter,
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

/// Days covered by the admin view when no range is given.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// GET /api/admin/entries and the export endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntryQuery {
    /// Case-insensitive substring of the student id
    pub student_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub habit: Option<Habit>,
    /// "all" | "validated" | "unvalidated". Default: "all"
    pub validation: Option<ValidationState>,
    /// Export filename stem. Default: "jurnal_{today}"
    pub stem: Option<String>,
}

impl AdminEntryQuery {
    /// Build the filter; with neither bound given the range is the last
    /// [`DEFAULT_RANGE_DAYS`] days up to `today`.
    pub fn to_filter(&self, today: NaiveDate) -> EntryFilter {
        let (from, to) = match (self.from, self.to) {
            (None, None) => (
                Some(today - chrono::Duration::days(DEFAULT_RANGE_DAYS)),
                Some(today),
            ),
            bounds => bounds,
        };

        EntryFilter {
            student_id: None,
            student_search: self
                .student_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            from,
            to,
            habit: self.habit,
            validation: self.validation.unwrap_or_default(),
        }
    }

    pub fn stem(&self, today: NaiveDate) -> String {
        match self.stem.as_deref() {
            Some(stem) => crate::export::sanitize_stem(stem),
            None => format!("jurnal_{}", today.format("%Y-%m-%d")),
        }
    }
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub store: bool,
}
