use std::sync::Arc;

use notes_core::{Capability, NotesError, RequireCapability, ServiceHooks};
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;
use validator::Validate;

use super::notes_hooks::EnforceNoteQuota;

pub const SERVICE: &str = "notes";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// Absent fields are left alone. A `null` title is rejected, a `null`
/// content clears the stored content.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNote {
    #[serde(default, deserialize_with = "present_string")]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "nullable_string")]
    pub content: Option<Option<String>>,
}

impl UpdateNote {
    /// `None` keeps the content, `Some(None)` clears it.
    pub fn content_change(&self) -> Option<Option<&str>> {
        self.content.as_ref().map(|c| c.as_deref())
    }
}

fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

fn nullable_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Path ids that are not integers name no note at all.
pub fn parse_note_id(raw: &str) -> Result<i64, NotesError> {
    raw.parse::<i64>().map_err(|_| NotesError::not_found("Not Found"))
}

pub fn register_hooks(hooks: &mut ServiceHooks, pool: &SqlitePool, free_limit: i64) {
    let read = Arc::new(RequireCapability(Capability::ReadNotes));
    let write = Arc::new(RequireCapability(Capability::WriteNotes));

    hooks
        .before_find(read.clone())
        .before_get(read)
        .before_create(write.clone())
        .before_create(Arc::new(EnforceNoteQuota::new(pool.clone(), free_limit)))
        .before_update(write.clone())
        .before_remove(write);
}
