//! Handlers for the `/notes` resource.
//!
//! Every handler takes the caller's [`AuthUser`] explicitly and scopes all
//! repository calls to `auth.user_id`. A note owned by another user yields
//! the same 404 as a note that does not exist.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use notes_core::error::CoreError;
use notes_core::notes::{CreateNoteInput, NoteFields, NotePatch, UpdateMode, NOTE_ENTITY};
use notes_core::types::DbId;
use notes_db::models::note::Note;
use notes_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppJsonOrDefault, AppPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: NOTE_ENTITY,
        id,
    })
}

/// GET /notes/
///
/// List the caller's notes, most recently updated first.
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Note>>> {
    let notes = NoteRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(notes))
}

/// POST /notes/
///
/// Create a note owned by the caller. `name` and `content` default to `""`.
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNoteInput>,
) -> AppResult<(StatusCode, Json<Note>)> {
    let fields = input.into_fields()?;
    let note = NoteRepo::create(&state.pool, auth.user_id, &fields).await?;

    tracing::info!(note_id = note.id, user_id = auth.user_id, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes/{id}/
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(note_id): AppPath<DbId>,
) -> AppResult<Json<Note>> {
    let note = NoteRepo::find_for_owner(&state.pool, note_id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(note_id))?;

    Ok(Json(note))
}

/// PUT /notes/{id}/
///
/// Full update: the payload must carry a non-empty title.
pub async fn replace_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(note_id): AppPath<DbId>,
    AppJsonOrDefault(patch): AppJsonOrDefault<NotePatch>,
) -> AppResult<Json<Note>> {
    update_note(&state, auth, note_id, patch, UpdateMode::Replace).await
}

/// PATCH /notes/{id}/
///
/// Partial update: only keys present in the payload are applied. An empty
/// body changes nothing.
pub async fn patch_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(note_id): AppPath<DbId>,
    AppJsonOrDefault(patch): AppJsonOrDefault<NotePatch>,
) -> AppResult<Json<Note>> {
    update_note(&state, auth, note_id, patch, UpdateMode::Partial).await
}

/// DELETE /notes/{id}/
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(note_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !NoteRepo::delete(&state.pool, note_id, auth.user_id).await? {
        return Err(not_found(note_id));
    }

    tracing::info!(note_id, user_id = auth.user_id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Shared body of PUT and PATCH.
///
/// Ownership is checked before the payload is validated, so a foreign note
/// is a 404 even when the payload would also be rejected.
async fn update_note(
    state: &AppState,
    auth: AuthUser,
    note_id: DbId,
    patch: NotePatch,
    mode: UpdateMode,
) -> AppResult<Json<Note>> {
    let current = NoteRepo::find_for_owner(&state.pool, note_id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(note_id))?;

    let fields = patch.apply(
        NoteFields {
            name: current.name,
            title: current.title,
            content: current.content,
        },
        mode,
    )?;

    // The note may have been deleted between the read and the write.
    let note = NoteRepo::update(&state.pool, note_id, auth.user_id, &fields)
        .await?
        .ok_or_else(|| not_found(note_id))?;

    tracing::info!(note_id, user_id = auth.user_id, ?mode, "Note updated");

    Ok(Json(note))
}
