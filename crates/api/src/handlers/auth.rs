//! Handlers for registration, login and token refresh.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use notes_core::auth::{validate_login, validate_registration, INVALID_CREDENTIALS};
use notes_core::error::CoreError;
use notes_core::types::DbId;
use notes_db::models::user::{CreateUser, User};
use notes_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{decode_token, issue_token, TokenType};
use crate::auth::password::{hash_password, verify_password, verify_without_account};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register/`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /login/`. Either `username` or `email` identifies the user.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /token/refresh/`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Refresh/access token pair.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Successful authentication response returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub tokens: TokenPair,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register/
///
/// Create an account and return it together with a fresh token pair.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let reg = validate_registration(
        input.username.as_deref(),
        input.email.as_deref(),
        input.password.as_deref(),
    )?;

    if UserRepo::username_exists(&state.pool, reg.username).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "username already taken".into(),
        )));
    }
    if UserRepo::email_exists(&state.pool, reg.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "email already registered".into(),
        )));
    }

    let password_hash = hash_password(reg.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent registration can still win the race; the unique
    // constraint violation is reported as a conflict by `AppError`.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: reg.username.to_string(),
            email: reg.email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /login/
///
/// Authenticate with username or email plus password.
///
/// The identifier is first tried as a username; if that does not
/// authenticate, it is looked up as an email. Every failure is reported as
/// the same 401 so callers cannot tell which step failed.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let creds = validate_login(
        input.username.as_deref(),
        input.email.as_deref(),
        input.password.as_deref(),
    )?;

    let by_username = UserRepo::find_by_username(&state.pool, creds.identifier).await?;
    let user = match check_password(by_username, creds.password)? {
        Some(user) => Some(user),
        None => {
            let by_email = UserRepo::find_by_email(&state.pool, creds.identifier).await?;
            check_password(by_email, creds.password)?
        }
    };

    let user = user.ok_or_else(|| {
        tracing::debug!("Login rejected");
        AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
    })?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(auth_response(&state, user)?))
}

/// POST /token/refresh/
///
/// Exchange a valid refresh token for a new token pair. Refresh tokens are
/// self-contained, so the presented one stays valid until it expires.
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token = input
        .refresh
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("refresh token required".into())))?;

    let claims = decode_token(&token, TokenType::Refresh, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Refresh token rejected");
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    })?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    tracing::info!(user_id = user.id, "Tokens refreshed");

    Ok(Json(auth_response(&state, user)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Check `password` against a looked-up account.
///
/// A missing account still pays for one Argon2 verification, so an unknown
/// identifier and a wrong password take the same time to reject.
fn check_password(user: Option<User>, password: &str) -> AppResult<Option<User>> {
    let Some(user) = user else {
        verify_without_account(password);
        return Ok(None);
    };

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    Ok(valid.then_some(user))
}

/// Sign a fresh token pair for `user`. Nothing is written to the database.
fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let sign = |token_type| {
        issue_token(user.id, token_type, jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
    };

    let tokens = TokenPair {
        access: sign(TokenType::Access)?,
        refresh: sign(TokenType::Refresh)?,
    };

    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        tokens,
    })
}
