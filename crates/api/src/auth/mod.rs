//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed access and refresh tokens.

pub mod jwt;
pub mod password;
