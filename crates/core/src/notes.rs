//! Note validation and update rules.
//!
//! Handlers parse request bodies into [`CreateNoteInput`] or [`NotePatch`]
//! and resolve them here into the concrete [`NoteFields`] that get written.

use serde::Deserialize;

use crate::error::CoreError;
use crate::patch::present;

/// Entity name used in not-found errors.
pub const NOTE_ENTITY: &str = "Note";

/// The user-editable columns of a note, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    pub name: String,
    pub title: String,
    pub content: String,
}

/// Request body for creating a note.
///
/// Every field is optional at the type level so a missing title surfaces as
/// a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteInput {
    pub title: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
}

impl CreateNoteInput {
    /// Validate the payload and fill in defaults for `name` and `content`.
    pub fn into_fields(self) -> Result<NoteFields, CoreError> {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Validation("title is required".into()))?;

        Ok(NoteFields {
            name: self.name.unwrap_or_default(),
            title,
            content: self.content.unwrap_or_default(),
        })
    }
}

/// How an update payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// `PUT`: the payload must carry a non-empty title.
    Replace,
    /// `PATCH`: only the keys present in the payload are applied.
    Partial,
}

/// Request body for updating a note.
///
/// Each field is tri-state, see [`crate::patch::present`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
}

impl NotePatch {
    /// Apply this patch on top of `current`, returning the fields to persist.
    ///
    /// - `title`: applied only when present and non-null; a null title is
    ///   ignored and an empty title is rejected, so it can never be cleared.
    /// - `name` / `content`: applied when present; `null` clears to `""`.
    pub fn apply(self, current: NoteFields, mode: UpdateMode) -> Result<NoteFields, CoreError> {
        if mode == UpdateMode::Replace && !matches!(&self.title, Some(Some(t)) if !t.is_empty()) {
            return Err(CoreError::Validation("title required for PUT".into()));
        }

        let mut next = current;

        if let Some(Some(title)) = self.title {
            if title.is_empty() {
                return Err(CoreError::Validation("title cannot be empty".into()));
            }
            next.title = title;
        }
        if let Some(name) = self.name {
            next.name = name.unwrap_or_default();
        }
        if let Some(content) = self.content {
            next.content = content.unwrap_or_default();
        }

        Ok(next)
    }
}
