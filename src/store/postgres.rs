use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{EntryStore, StoreError, StoreResult};
use crate::models::entry::{EntryContent, HabitDetail, JournalEntry, Religion};
use crate::models::filter::{EntryFilter, ValidationPatch, ValidationState};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await
}

const SELECT_ENTRY: &str = r#"
    SELECT id, student_id, entry_date, religion, detail, notes,
           validated_by_teacher, validated_by_parent, created_at, updated_at
    FROM journal_entries
"#;

#[derive(Debug, FromRow)]
struct EntryRow {
    id: Uuid,
    student_id: String,
    entry_date: NaiveDate,
    religion: Option<String>,
    detail: Json<HabitDetail>,
    notes: Option<String>,
    validated_by_teacher: bool,
    validated_by_parent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for JournalEntry {
    type Error = StoreError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let religion = row
            .religion
            .as_deref()
            .map(str::parse::<Religion>)
            .transpose()
            .map_err(|e| StoreError::Transport(format!("corrupt row {}: {e}", row.id)))?;

        Ok(JournalEntry {
            id: row.id,
            content: EntryContent {
                student_id: row.student_id,
                date: row.entry_date,
                religion,
                detail: row.detail.0,
                notes: row.notes,
            },
            validated_by_teacher: row.validated_by_teacher,
            validated_by_parent: row.validated_by_parent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed store. The habit payload lives in a JSONB column; the
/// habit name is duplicated into its own column for filtering.
#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    async fn fetch(&self, id: Uuid) -> StoreResult<Option<JournalEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!("{SELECT_ENTRY} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        row.map(JournalEntry::try_from).transpose()
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn create(&self, content: EntryContent) -> StoreResult<JournalEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO journal_entries (id, student_id, entry_date, habit, religion, detail, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, student_id, entry_date, religion, detail, notes,
                      validated_by_teacher, validated_by_parent, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&content.student_id)
        .bind(content.date)
        .bind(content.habit().as_str())
        .bind(content.religion.map(|r| r.as_str()))
        .bind(Json(&content.detail))
        .bind(&content.notes)
        .fetch_one(&self.db)
        .await?;

        JournalEntry::try_from(row)
    }

    async fn get(&self, id: Uuid) -> StoreResult<JournalEntry> {
        self.fetch(id).await?.ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: Uuid, content: EntryContent) -> StoreResult<JournalEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE journal_entries SET
                student_id = $2,
                entry_date = $3,
                habit = $4,
                religion = $5,
                detail = $6,
                notes = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, student_id, entry_date, religion, detail, notes,
                      validated_by_teacher, validated_by_parent, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&content.student_id)
        .bind(content.date)
        .bind(content.habit().as_str())
        .bind(content.religion.map(|r| r.as_str()))
        .bind(Json(&content.detail))
        .bind(&content.notes)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        JournalEntry::try_from(row)
    }

    async fn set_validation(&self, id: Uuid, patch: ValidationPatch) -> StoreResult<JournalEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE journal_entries SET
                validated_by_teacher = COALESCE($2, validated_by_teacher),
                validated_by_parent = COALESCE($3, validated_by_parent),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, student_id, entry_date, religion, detail, notes,
                      validated_by_teacher, validated_by_parent, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.validated_by_teacher)
        .bind(patch.validated_by_parent)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        JournalEntry::try_from(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: &EntryFilter) -> StoreResult<Vec<JournalEntry>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_ENTRY);
        query.push(" WHERE TRUE");
        if let Some(student_id) = &filter.student_id {
            query.push(" AND student_id = ").push_bind(student_id.clone());
        }
        if let Some(needle) = &filter.student_search {
            query
                .push(" AND student_id ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)));
        }
        if let Some(from) = filter.from {
            query.push(" AND entry_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND entry_date <= ").push_bind(to);
        }
        if let Some(habit) = filter.habit {
            query.push(" AND habit = ").push_bind(habit.as_str());
        }
        match filter.validation {
            ValidationState::All => {}
            ValidationState::Validated => {
                query.push(" AND validated_by_teacher AND validated_by_parent");
            }
            ValidationState::Unvalidated => {
                query.push(" AND NOT (validated_by_teacher AND validated_by_parent)");
            }
        }
        query.push(" ORDER BY entry_date ASC, created_at ASC");

        let rows = query
            .build_query_as::<EntryRow>()
            .fetch_all(&self.db)
            .await?;
        rows.into_iter().map(JournalEntry::try_from).collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("S_1%"), "S\\_1\\%");
        assert_eq!(escape_like("plain"), "plain");
    }
}
