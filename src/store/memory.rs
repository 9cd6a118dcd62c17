use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{EntryStore, StoreError, StoreResult};
use crate::models::entry::{EntryContent, JournalEntry};
use crate::models::filter::{EntryFilter, ValidationPatch};

/// In-process store for development and tests. Entries live in insertion
/// order for the lifetime of the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn create(&self, content: EntryContent) -> StoreResult<JournalEntry> {
        let entry = JournalEntry::new(Uuid::new_v4(), content, Utc::now());
        self.entries.lock().await.push(entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: Uuid) -> StoreResult<JournalEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: Uuid, content: EntryContent) -> StoreResult<JournalEntry> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.content = content;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn set_validation(&self, id: Uuid, patch: ValidationPatch) -> StoreResult<JournalEntry> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(entry);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: &EntryFilter) -> StoreResult<Vec<JournalEntry>> {
        let mut matched: Vec<JournalEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.date());
        Ok(matched)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
