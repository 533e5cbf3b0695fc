//! Note entity model.
//!
//! Inserts and updates take [`notes_core::notes::NoteFields`], which is the
//! already-validated set of editable columns.

use notes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notes` table.
///
/// `owner_id` is used for scoping queries and is not part of the API shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: DbId,
    pub name: String,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
