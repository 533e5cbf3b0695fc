//! Repository for the `notes` table.
//!
//! Every query that addresses a single note filters on both `id` and
//! `owner_id`. A note owned by someone else is therefore indistinguishable
//! from one that does not exist.

use notes_core::notes::NoteFields;
use notes_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::Note;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, title, content, created_at, updated_at";

/// Provides owner-scoped CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note for `owner_id`. Both timestamps are set to now.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        fields: &NoteFields,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (owner_id, name, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(owner_id)
            .bind(&fields.name)
            .bind(&fields.title)
            .bind(&fields.content)
            .fetch_one(pool)
            .await
    }

    /// List every note owned by `owner_id`, most recently updated first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE owner_id = $1
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find a note by ID, only if it belongs to `owner_id`.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the editable columns and bump `updated_at`.
    ///
    /// Returns `None` if no note with `id` belongs to `owner_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        fields: &NoteFields,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                name = $3,
                title = $4,
                content = $5,
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&fields.name)
            .bind(&fields.title)
            .bind(&fields.content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note owned by `owner_id`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
