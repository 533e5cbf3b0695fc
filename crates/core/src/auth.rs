//! Credential validation for registration and login.

use crate::error::CoreError;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Validated registration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Validated login input. `identifier` is either a username or an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Require username, email and password to be present and non-empty.
pub fn validate_registration<'a>(
    username: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<Registration<'a>, CoreError> {
    match (non_empty(username), non_empty(email), non_empty(password)) {
        (Some(username), Some(email), Some(password)) => Ok(Registration {
            username,
            email,
            password,
        }),
        _ => Err(CoreError::Validation(
            "username, email and password required".into(),
        )),
    }
}

/// Pick the login identifier (username first, then email) and require a password.
pub fn validate_login<'a>(
    username: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<Credentials<'a>, CoreError> {
    let identifier = non_empty(username).or(non_empty(email));
    match (identifier, non_empty(password)) {
        (Some(identifier), Some(password)) => Ok(Credentials {
            identifier,
            password,
        }),
        _ => Err(CoreError::Validation(
            "Provide username/email and password".into(),
        )),
    }
}
