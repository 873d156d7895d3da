//! Account registration, login, and logout handlers.

use crate::auth::bearer_token;
use crate::error::HttpError;
use crate::AppState;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use snipbin_core::models::user::{LoginRequest, RegisterRequest, User};
use snipbin_core::AppError;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

/// Public view of an account; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Session payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

fn bad_request(message: &str) -> HttpError {
    HttpError(AppError::BadRequest(message.to_string()))
}

fn required(field: Option<String>, message: &str) -> Result<String, HttpError> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| bad_request(message))
}

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), HttpError> {
    let username = required(req.username, "Username is required")?;
    let email = required(req.email, "Email is required")?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad_request("Password is required"))?;

    if username.len() < MIN_USERNAME_LEN {
        return Err(bad_request("Username must be at least 3 characters"));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(bad_request(
            "Username may only contain letters, digits, '-' and '_'",
        ));
    }
    if !email.contains('@') {
        return Err(bad_request("Email address is invalid"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(bad_request("Password must be at least 8 characters"));
    }

    let user = User::new(username, email, &password)?;
    state.db.users.create(&user)?;
    let token = state.db.users.create_session(&user.id)?;
    tracing::info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: UserResponse::from_user(&user),
        }),
    ))
}

/// `POST /api/v1/auth/login`
///
/// Unknown usernames and wrong passwords produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, HttpError> {
    let username = required(req.username, "Username is required")?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad_request("Password is required"))?;

    let invalid = || HttpError(AppError::Unauthorized("Invalid username or password".to_string()));
    let user = state
        .db
        .users
        .get_by_username(&username)?
        .ok_or_else(invalid)?;
    if !user.verify_password(&password) {
        return Err(invalid());
    }

    let token = state.db.users.create_session(&user.id)?;
    tracing::info!("User {} logged in", user.username);
    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from_user(&user),
    }))
}

/// `POST /api/v1/auth/logout` — invalidates the presented session token.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, HttpError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            HttpError(AppError::Unauthorized(
                "Authentication required".to_string(),
            ))
        })?;
    state.db.users.remove_session(token)?;
    Ok(Json(serde_json::json!({ "logged_out": true })))
}
