//! Persistence for journal entries.
//!
//! Handlers and services only see the [`EntryStore`] trait; `main` picks the
//! Postgres backend when `DATABASE_URL` is set and the in-memory one
//! otherwise.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::entry::{EntryContent, JournalEntry};
use crate::models::filter::{EntryFilter, ValidationPatch};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgEntryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entry {0} not found")]
    NotFound(Uuid),

    #[error("Storage unavailable: {0}")]
    Transport(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist a new entry, assigning its id and timestamps.
    async fn create(&self, content: EntryContent) -> StoreResult<JournalEntry>;

    async fn get(&self, id: Uuid) -> StoreResult<JournalEntry>;

    /// Replace the content of an entry. Validation flags are left as they are.
    async fn update(&self, id: Uuid, content: EntryContent) -> StoreResult<JournalEntry>;

    async fn set_validation(&self, id: Uuid, patch: ValidationPatch) -> StoreResult<JournalEntry>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Matching entries ordered by date, then creation time.
    async fn list(&self, filter: &EntryFilter) -> StoreResult<Vec<JournalEntry>>;

    async fn ping(&self) -> StoreResult<()>;
}
