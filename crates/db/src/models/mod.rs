//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, plus the DTO used to insert it.

pub mod note;
pub mod user;
