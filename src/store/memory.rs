use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::analytics::metrics::MetricKey;
use crate::error::{AppError, AppResult};
use crate::models::entry::DailyEntry;
use crate::models::note::{Note, NoteUpdate, Partner};
use crate::store::{EntryStore, NoteStore};

/// Process-local entry store (single-instance deployments and tests).
#[derive(Clone, Default)]
pub struct MemoryEntryStore {
    entries: Arc<Mutex<BTreeMap<NaiveDate, DailyEntry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entries(entries: impl IntoIterator<Item = DailyEntry>) -> Self {
        let map = entries.into_iter().map(|e| (e.date, e)).collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn list_entries(&self) -> AppResult<Vec<DailyEntry>> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }

    async fn list_entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyEntry>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .lock()
            .await
            .range(start..=end)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn get_or_create(&self, date: NaiveDate) -> AppResult<DailyEntry> {
        let mut entries = self.entries.lock().await;
        Ok(entries
            .entry(date)
            .or_insert_with(|| DailyEntry::empty(date))
            .clone())
    }

    async fn adjust_metric(
        &self,
        date: NaiveDate,
        metric: MetricKey,
        delta: f64,
    ) -> AppResult<DailyEntry> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(date)
            .or_insert_with(|| DailyEntry::empty(date));
        entry.adjust(metric, delta);
        Ok(entry.clone())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list_notes(&self) -> AppResult<Vec<Note>> {
        let mut notes: Vec<Note> = self.notes.lock().await.values().cloned().collect();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notes)
    }

    async fn create_note(
        &self,
        content: &str,
        author: Partner,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author,
            timestamp,
            is_read: false,
            is_favorite: false,
        };
        self.notes.lock().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, update: &NoteUpdate) -> AppResult<Note> {
        let mut notes = self.notes.lock().await;
        let note = notes
            .get_mut(&id)
            .ok_or(AppError::NotFound("Note not found".into()))?;
        update.apply(note);
        Ok(note.clone())
    }

    async fn delete_note(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.notes.lock().await.remove(&id).is_some())
    }

    async fn ping(&self) -> bool {
        true
    }
}
