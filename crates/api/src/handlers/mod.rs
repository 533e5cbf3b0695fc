//! Request handlers.
//!
//! Handlers validate input through `notes_core`, delegate to the
//! repositories in `notes_db`, and map failures via [`crate::error::AppError`].

pub mod auth;
pub mod notes;
