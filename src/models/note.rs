use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A personal note, private to its author.
///
/// Addressed by `slug`, which is unique across all notes (case-sensitive).
/// A note omitted its slug at creation gets one derived from the title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The note form as submitted to the create and edit endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    /// Desired slug. Omitted or empty means "derive one from the title".
    #[serde(default)]
    pub slug: Option<String>,
}
