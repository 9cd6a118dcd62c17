//! Journal operations shared by the student and admin handlers.
//!
//! Every write goes through the rule table in `models::draft` before it
//! reaches the store. Ownership is enforced here: a student touching
//! someone else's entry gets the same NotFound as for a missing id.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::draft::{EntryDraft, ValidationErrors};
use crate::models::entry::JournalEntry;
use crate::models::filter::{EntryFilter, ValidationPatch};
use crate::store::{EntryStore, StoreError};

pub async fn create_entry(store: &dyn EntryStore, draft: EntryDraft) -> AppResult<JournalEntry> {
    let content = draft.into_content()?;
    let entry = store.create(content).await?;

    tracing::info!(
        entry_id = %entry.id,
        student_id = %entry.student_id(),
        habit = %entry.habit(),
        "journal entry created"
    );
    Ok(entry)
}

/// Fetch an entry, optionally requiring that `owner` wrote it.
pub async fn fetch_entry(
    store: &dyn EntryStore,
    id: Uuid,
    owner: Option<&str>,
) -> AppResult<JournalEntry> {
    let entry = store.get(id).await?;
    match owner {
        Some(owner) if entry.student_id() != owner => Err(StoreError::NotFound(id).into()),
        _ => Ok(entry),
    }
}

/// Apply a partial content edit. The merged draft is validated against the
/// (possibly new) habit before anything is written.
pub async fn update_entry(
    store: &dyn EntryStore,
    id: Uuid,
    owner: Option<&str>,
    edit: EntryDraft,
) -> AppResult<JournalEntry> {
    let existing = fetch_entry(store, id, owner).await?;
    let previous_habit = existing.habit();

    let content = EntryDraft::from(&existing.content)
        .merge(edit)
        .into_content()?;
    let entry = store.update(id, content).await?;

    if entry.habit() != previous_habit {
        tracing::info!(
            entry_id = %id,
            from = %previous_habit,
            to = %entry.habit(),
            "journal entry switched habit"
        );
    } else {
        tracing::debug!(entry_id = %id, "journal entry updated");
    }
    Ok(entry)
}

/// Set teacher and/or parent confirmation. Flags absent from the patch keep
/// their current value.
pub async fn set_validation(
    store: &dyn EntryStore,
    id: Uuid,
    patch: ValidationPatch,
) -> AppResult<JournalEntry> {
    if patch.is_empty() {
        return Err(AppError::Validation(ValidationErrors::single(
            "validatedByTeacher",
            "at least one of validatedByTeacher or validatedByParent must be given",
        )));
    }

    let entry = store.set_validation(id, patch).await?;
    tracing::info!(
        entry_id = %id,
        teacher = entry.validated_by_teacher,
        parent = entry.validated_by_parent,
        "journal entry validation changed"
    );
    Ok(entry)
}

pub async fn delete_entry(store: &dyn EntryStore, id: Uuid, owner: Option<&str>) -> AppResult<()> {
    fetch_entry(store, id, owner).await?;
    store.delete(id).await?;
    tracing::info!(entry_id = %id, "journal entry deleted");
    Ok(())
}

pub async fn list_entries(store: &dyn EntryStore, filter: &EntryFilter) -> AppResult<Vec<JournalEntry>> {
    Ok(store.list(filter).await?)
}
