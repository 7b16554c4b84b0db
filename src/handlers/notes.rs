use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::note::{CreateNoteRequest, Note, NoteUpdate};
use crate::AppState;

pub async fn list_notes(State(state): State<AppState>) -> AppResult<Json<Vec<Note>>> {
    let notes = state.notes.list_notes().await?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<Note>)> {
    body.validate()?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Note content cannot be blank".into()));
    }

    let note = state
        .notes
        .create_note(content, body.author, Utc::now())
        .await?;

    tracing::info!(note_id = %note.id, author = ?note.author, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<NoteUpdate>,
) -> AppResult<Json<Note>> {
    if body.is_empty() {
        return Err(AppError::Validation(
            "Provide isRead and/or isFavorite".into(),
        ));
    }

    let note = state.notes.update_note(id, &body).await?;
    Ok(Json(note))
}

/// Idempotent: deleting a missing note still succeeds.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let removed = state.notes.delete_note(id).await?;
    if removed {
        tracing::info!(note_id = %id, "Note deleted");
    }

    Ok(Json(json!({ "deleted": true })))
}
