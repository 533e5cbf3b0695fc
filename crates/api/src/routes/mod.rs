pub mod auth;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register/                                       register (public)
/// /login/                                          login (public)
/// /token/refresh/                                  refresh (public)
///
/// /notes/                                          list, create (auth required)
/// /notes/{id}/                                     get, put, patch, delete (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(notes::router())
}
