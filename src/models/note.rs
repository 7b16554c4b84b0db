use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub author: Partner,
    #[sqlx(rename = "created_at")]
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "partner", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Partner {
    Partner1,
    Partner2,
}

/// POST /api/notes
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 2000, message = "Note must be 1-2000 characters"))]
    pub content: String,
    pub author: Partner,
}

/// PUT /api/notes/:id: flag update, both fields optional
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub is_read: Option<bool>,
    pub is_favorite: Option<bool>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.is_read.is_none() && self.is_favorite.is_none()
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(is_read) = self.is_read {
            note.is_read = is_read;
        }
        if let Some(is_favorite) = self.is_favorite {
            note.is_favorite = is_favorite;
        }
    }
}
