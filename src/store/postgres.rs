use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::metrics::MetricKey;
use crate::error::{AppError, AppResult};
use crate::models::entry::DailyEntry;
use crate::models::note::{Note, NoteUpdate, Partner};
use crate::store::{EntryStore, NoteStore};

const ENTRY_COLUMNS: &str =
    "entry_date, love_count, quality_time_hours, dishes_done, trash_out_hours, pet_care_duties";

const NOTE_COLUMNS: &str = "id, content, author, created_at, is_read, is_favorite";

#[derive(Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Upsert that adds `$2` to one metric column, never going below zero.
fn adjust_sql(metric: MetricKey) -> String {
    let column = metric.column();
    format!(
        r#"
        INSERT INTO daily_entries (entry_date, {column})
        VALUES ($1, GREATEST(0, $2))
        ON CONFLICT (entry_date) DO UPDATE SET
            {column} = GREATEST(0, daily_entries.{column} + $2),
            updated_at = NOW()
        RETURNING {ENTRY_COLUMNS}
        "#
    )
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn list_entries(&self) -> AppResult<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries ORDER BY entry_date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn list_entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM daily_entries
            WHERE entry_date BETWEEN $1 AND $2
            ORDER BY entry_date ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn get_or_create(&self, date: NaiveDate) -> AppResult<DailyEntry> {
        // No-op update so RETURNING yields the existing row on conflict
        let entry = sqlx::query_as::<_, DailyEntry>(&format!(
            r#"
            INSERT INTO daily_entries (entry_date)
            VALUES ($1)
            ON CONFLICT (entry_date) DO UPDATE
                SET updated_at = daily_entries.updated_at
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn adjust_metric(
        &self,
        date: NaiveDate,
        metric: MetricKey,
        delta: f64,
    ) -> AppResult<DailyEntry> {
        let sql = adjust_sql(metric);
        let query = sqlx::query_as::<_, DailyEntry>(&sql).bind(date);
        let query = if metric.is_count() {
            query.bind(delta.round() as i32)
        } else {
            query.bind(delta)
        };

        let entry = query.fetch_one(&self.pool).await?;

        tracing::debug!(date = %date, metric = %metric, delta, "Metric adjusted");
        Ok(entry)
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list_notes(&self) -> AppResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn create_note(
        &self,
        content: &str,
        author: Partner,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Note> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (id, content, author, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(content)
        .bind(author)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn update_note(&self, id: Uuid, update: &NoteUpdate) -> AppResult<Note> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes SET
                is_read = COALESCE($2, is_read),
                is_favorite = COALESCE($3, is_favorite)
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.is_read)
        .bind(update.is_favorite)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Note not found".into()))?;

        Ok(note)
    }

    async fn delete_note(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_sql_targets_metric_column() {
        for metric in MetricKey::ALL {
            let sql = adjust_sql(metric);
            let column = metric.column();
            assert!(sql.contains(&format!("(entry_date, {column})")));
            assert!(sql.contains(&format!("GREATEST(0, daily_entries.{column} + $2)")));
            assert!(sql.contains("RETURNING entry_date, love_count"));
        }
    }
}
