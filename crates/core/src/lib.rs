//! Domain types, errors, and request validation shared by the notes backend.
//!
//! Nothing in this crate touches the database or HTTP; the `notes-db` and
//! `notes-api` crates build on these primitives.

pub mod auth;
pub mod error;
pub mod notes;
pub mod patch;
pub mod types;
