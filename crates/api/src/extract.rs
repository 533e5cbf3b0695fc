//! Extractors whose rejections use the JSON error format.
//!
//! Axum's stock `Json` and `Path` reject with plain-text bodies and, for
//! JSON data errors, a 422 status. These wrappers route every rejection
//! through [`AppError`], so a malformed body or a non-numeric id is a 400
//! with the same `{ "detail", "code" }` shape as every other error.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, FromRequestParts, Request};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] as a request extractor.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Drop-in replacement for [`axum::extract::Path`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Like [`AppJson`], but an empty body reads as `T::default()`.
///
/// Update endpoints accept a bare request with no payload the same as `{}`.
/// A non-empty body goes through the normal JSON checks, content type
/// included.
#[derive(Debug)]
pub struct AppJsonOrDefault<T>(pub T);

impl<T, S> FromRequest<S> for AppJsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let mut req = Request::new(Body::from(bytes));
        *req.headers_mut() = headers;
        let AppJson(value) = AppJson::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
