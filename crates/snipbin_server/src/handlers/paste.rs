//! Paste HTTP handlers.

use crate::auth::MaybeUser;
use crate::error::{paste_not_found, HttpError};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use snipbin_core::db::paste::Page;
use snipbin_core::models::paste::{
    expiry_from_choice, CreatePasteRequest, ListQuery, Paste, PreviewKind, UpdatePasteRequest,
    DEFAULT_LANGUAGE,
};
use snipbin_core::AppError;

/// Characters of content shown in listing previews.
const PREVIEW_CHARS: usize = 200;

/// Maximum title length in characters.
const MAX_TITLE_CHARS: usize = 200;

/// Full paste representation returned by create/get.
#[derive(Debug, Serialize)]
pub struct PasteResponse {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub views: u64,
    pub url: String,
    pub raw_url: String,
    pub html_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Truncated representation used in listings.
#[derive(Debug, Serialize)]
pub struct PasteSummary {
    pub id: String,
    pub title: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub views: u64,
    pub content_preview: String,
    pub url: String,
}

impl PasteResponse {
    fn from_paste(paste: &Paste) -> Self {
        Self {
            id: paste.id.clone(),
            title: paste.title.clone(),
            content: paste.content.clone(),
            language: paste.language.clone(),
            created_at: paste.created_at,
            expires_at: paste.expires_at,
            is_public: paste.is_public,
            views: paste.views,
            url: format!("/api/v1/pastes/{}", paste.id),
            raw_url: format!("/api/v1/pastes/{}/raw", paste.id),
            html_url: format!("/api/v1/pastes/{}/html", paste.id),
            preview_url: paste
                .is_previewable()
                .then(|| format!("/api/v1/pastes/{}/preview", paste.id)),
        }
    }
}

impl PasteSummary {
    fn from_paste(paste: &Paste) -> Self {
        Self {
            id: paste.id.clone(),
            title: paste.title.clone(),
            language: paste.language.clone(),
            created_at: paste.created_at,
            expires_at: paste.expires_at,
            is_public: paste.is_public,
            views: paste.views,
            content_preview: content_preview(&paste.content),
            url: format!("/api/v1/pastes/{}", paste.id),
        }
    }
}

fn content_preview(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    if preview.len() < content.len() {
        preview.push_str("...");
    }
    preview
}

fn normalized_title(title: Option<String>) -> Result<Option<String>, HttpError> {
    let Some(title) = title else {
        return Ok(None);
    };
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(HttpError(AppError::BadRequest(format!(
            "Title exceeds maximum length of {} characters",
            MAX_TITLE_CHARS
        ))));
    }
    Ok(Some(trimmed.to_string()))
}

/// Load a paste and apply the visibility predicate, mapping every invisible
/// case (missing, expired, private to someone else) to the same 404.
fn visible_paste(state: &AppState, id: &str, requester: &MaybeUser) -> Result<Paste, HttpError> {
    let paste = state.db.pastes.get(id)?.ok_or_else(paste_not_found)?;
    if !paste.visible_to(requester.id()) {
        return Err(paste_not_found());
    }
    Ok(paste)
}

/// Authorization for mutations: 401 when anonymous, 404 only when the id
/// does not exist, 403 for any authenticated non-owner. Expiry is not
/// consulted, so owners can still update or delete rows that have expired.
fn owned_paste(state: &AppState, id: &str, requester: &MaybeUser) -> Result<Paste, HttpError> {
    let Some(user_id) = requester.id() else {
        return Err(HttpError(AppError::Unauthorized(
            "Authentication required".to_string(),
        )));
    };
    let paste = state.db.pastes.get(id)?.ok_or_else(paste_not_found)?;
    if paste.owned_by(Some(user_id)) {
        Ok(paste)
    } else {
        Err(HttpError(AppError::Forbidden(
            "You do not own this paste".to_string(),
        )))
    }
}

fn check_size(content: &str, max: usize) -> Result<(), HttpError> {
    if content.len() > max {
        return Err(HttpError(AppError::BadRequest(format!(
            "Paste exceeds maximum size of {} bytes",
            max
        ))));
    }
    Ok(())
}

/// `POST /api/v1/pastes`
pub async fn create_paste(
    State(state): State<AppState>,
    requester: MaybeUser,
    Json(req): Json<CreatePasteRequest>,
) -> Result<(StatusCode, Json<PasteResponse>), HttpError> {
    let content = req
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| HttpError(AppError::BadRequest("Content is required".to_string())))?;
    check_size(&content, state.config.max_paste_size)?;

    // Detection is only offered through the assist endpoints; an omitted
    // language means plain text.
    let language = match req.language.as_deref().map(str::trim) {
        Some(lang) if !lang.is_empty() => lang.to_lowercase(),
        _ => DEFAULT_LANGUAGE.to_string(),
    };

    let mut paste = Paste::new(content);
    paste.title = normalized_title(req.title)?;
    paste.language = language;
    paste.is_public = req.is_public.unwrap_or(true);
    paste.user_id = requester.id().map(str::to_string);
    if let Some(choice) = req.expires_in.as_deref() {
        paste.expires_at = expiry_from_choice(choice, Utc::now());
    }

    let stored = state.db.pastes.create(paste)?;
    tracing::info!("Created paste {} ({})", stored.id, stored.language);
    Ok((StatusCode::CREATED, Json(PasteResponse::from_paste(&stored))))
}

/// `GET /api/v1/pastes/:id` — counts a view.
pub async fn get_paste(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<PasteResponse>, HttpError> {
    visible_paste(&state, &id, &requester)?;
    let paste = state.db.pastes.record_view(&id)?.ok_or_else(paste_not_found)?;
    Ok(Json(PasteResponse::from_paste(&paste)))
}

/// `GET /api/v1/pastes/:id/raw` — plain text, no view counted.
pub async fn get_paste_raw(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let paste = visible_paste(&state, &id, &requester)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        paste.content,
    ))
}

/// `GET /api/v1/pastes/:id/html` — syntax-highlighted markup, counts a view.
pub async fn get_paste_html(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    visible_paste(&state, &id, &requester)?;
    let paste = state.db.pastes.record_view(&id)?.ok_or_else(paste_not_found)?;
    Ok(Html(paste.highlighted(&state.renderer, &state.registry)))
}

/// `GET /api/v1/pastes/:id/preview` — sanitized rendering for previewable
/// languages; 404 for everything else, no view counted.
pub async fn get_paste_preview(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let paste = visible_paste(&state, &id, &requester)?;
    let response = match paste.preview_kind() {
        Some(PreviewKind::Markdown) => {
            let markup = paste.markdown_preview().ok_or_else(paste_not_found)?;
            ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], markup)
        }
        Some(PreviewKind::Html) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            paste.html_sandbox(),
        ),
        Some(PreviewKind::Svg) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            paste.svg_document(),
        ),
        None => return Err(paste_not_found()),
    };
    Ok(response)
}

/// `PUT /api/v1/pastes/:id` — owner only.
pub async fn update_paste(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePasteRequest>,
) -> Result<Json<PasteResponse>, HttpError> {
    owned_paste(&state, &id, &requester)?;
    if let Some(content) = &req.content {
        if content.trim().is_empty() {
            return Err(HttpError(AppError::BadRequest(
                "Content cannot be empty".to_string(),
            )));
        }
        check_size(content, state.config.max_paste_size)?;
    }
    if let Some(title) = &req.title {
        if title.trim().chars().count() > MAX_TITLE_CHARS {
            return Err(HttpError(AppError::BadRequest(format!(
                "Title exceeds maximum length of {} characters",
                MAX_TITLE_CHARS
            ))));
        }
    }
    let updated = state.db.pastes.update(&id, &req)?.ok_or_else(paste_not_found)?;
    Ok(Json(PasteResponse::from_paste(&updated)))
}

/// `DELETE /api/v1/pastes/:id` — owner only.
pub async fn delete_paste(
    State(state): State<AppState>,
    requester: MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, HttpError> {
    owned_paste(&state, &id, &requester)?;
    if !state.db.pastes.delete(&id)? {
        return Err(paste_not_found());
    }
    tracing::info!("Deleted paste {}", id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `GET /api/v1/pastes` — public listing, newest first.
pub async fn list_pastes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<PasteSummary>>, HttpError> {
    let page = state.db.pastes.list_public(&query)?;
    Ok(Json(Page {
        items: page.items.iter().map(PasteSummary::from_paste).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        pages: page.pages,
        has_next: page.has_next,
        has_prev: page.has_prev,
    }))
}

/// `GET /api/v1/me/pastes` — everything the requester owns, private and
/// expired included.
pub async fn my_pastes(
    State(state): State<AppState>,
    requester: crate::auth::RequireUser,
) -> Result<Json<Vec<PasteSummary>>, HttpError> {
    let owned = state.db.pastes.by_owner(&requester.0.id)?;
    Ok(Json(owned.iter().map(PasteSummary::from_paste).collect()))
}

/// `GET /api/v1/stats`
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let pastes = state.db.pastes.stats()?;
    let users = state.db.users.count()?;
    Ok(Json(serde_json::json!({
        "total_pastes": pastes.total_pastes,
        "public_pastes": pastes.public_pastes,
        "total_users": users,
        "top_languages": pastes.top_languages,
    })))
}
