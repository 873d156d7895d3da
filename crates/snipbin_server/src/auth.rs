//! Bearer-token session extractors.
//!
//! Sessions are opaque tokens minted at register/login and presented as
//! `Authorization: Bearer <token>`. [`MaybeUser`] treats a missing header as
//! anonymous but rejects a present-but-invalid token, so expired sessions
//! surface as 401 instead of silently downgrading to anonymous access.

use crate::error::HttpError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use snipbin_core::models::user::User;
use snipbin_core::AppError;

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn header_token(parts: &Parts) -> Result<Option<&str>, HttpError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        HttpError(AppError::Unauthorized(
            "Malformed Authorization header".to_string(),
        ))
    })?;
    match bearer_token(value) {
        Some(token) => Ok(Some(token)),
        None => Err(HttpError(AppError::Unauthorized(
            "Malformed Authorization header".to_string(),
        ))),
    }
}

/// Optional authentication: anonymous requests pass through as `None`.
pub struct MaybeUser(pub Option<User>);

/// Mandatory authentication: rejects anonymous requests with 401.
pub struct RequireUser(pub User);

impl MaybeUser {
    /// Requester's user id, if authenticated.
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.id.as_str())
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = header_token(parts)? else {
            return Ok(Self(None));
        };
        match state.db.users.session_user(token)? {
            Some(user) => Ok(Self(Some(user))),
            None => Err(HttpError(AppError::Unauthorized(
                "Invalid or expired session".to_string(),
            ))),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(Self(user)),
            MaybeUser(None) => Err(HttpError(AppError::Unauthorized(
                "Authentication required".to_string(),
            ))),
        }
    }
}
