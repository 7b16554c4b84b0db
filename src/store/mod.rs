pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::analytics::metrics::MetricKey;
use crate::error::AppResult;
use crate::models::entry::DailyEntry;
use crate::models::note::{Note, NoteUpdate, Partner};

pub use memory::{MemoryEntryStore, MemoryNoteStore};
pub use postgres::{PgEntryStore, PgNoteStore};

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries, oldest first.
    async fn list_entries(&self) -> AppResult<Vec<DailyEntry>>;

    /// Entries with `start <= date <= end`, oldest first.
    async fn list_entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyEntry>>;

    /// The entry for `date`, created with all-zero metrics if absent.
    async fn get_or_create(&self, date: NaiveDate) -> AppResult<DailyEntry>;

    /// Add `delta` to one metric of `date`'s entry, creating it if needed.
    /// The stored value never drops below zero.
    async fn adjust_metric(
        &self,
        date: NaiveDate,
        metric: MetricKey,
        delta: f64,
    ) -> AppResult<DailyEntry>;

    async fn ping(&self) -> bool;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, newest first.
    async fn list_notes(&self) -> AppResult<Vec<Note>>;

    async fn create_note(
        &self,
        content: &str,
        author: Partner,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Note>;

    /// Fails with `NotFound` for an unknown id.
    async fn update_note(&self, id: Uuid, update: &NoteUpdate) -> AppResult<Note>;

    /// Returns whether a note was removed; deleting twice is not an error.
    async fn delete_note(&self, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> bool;
}
