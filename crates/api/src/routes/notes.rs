//! Route definitions for the `/notes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Note routes. All require a Bearer access token.
///
/// ```text
/// GET    /notes/       -> list_notes
/// POST   /notes/       -> create_note
/// GET    /notes/{id}/  -> get_note
/// PUT    /notes/{id}/  -> replace_note
/// PATCH  /notes/{id}/  -> patch_note
/// DELETE /notes/{id}/  -> delete_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}/",
            get(notes::get_note)
                .put(notes::replace_note)
                .patch(notes::patch_note)
                .delete(notes::delete_note),
        )
}
