//! Code assistance handlers.
//!
//! Detection and explanation are always served locally; completion goes
//! through the configured assistant and reports `available: false` instead of
//! erroring when the backend is offline or unreachable.

use crate::error::HttpError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use snipbin_core::detect::{detect_language, FALLBACK_LANGUAGE};
use snipbin_core::models::paste::DEFAULT_LANGUAGE;
use snipbin_core::AppError;

/// Snippets shorter than this are reported as plain text with low confidence.
const MIN_DETECT_LEN: usize = 10;
/// Number of language suggestions returned alongside a detection.
const SUGGESTION_COUNT: usize = 10;

/// Shared payload for the assist endpoints.
#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    pub code: Option<String>,
    pub language: Option<String>,
}

fn required_code(code: Option<String>) -> Result<String, HttpError> {
    code.filter(|c| !c.trim().is_empty())
        .ok_or_else(|| HttpError(AppError::BadRequest("Code is required".to_string())))
}

fn resolved_language(language: Option<&str>, code: &str) -> String {
    match language.map(str::trim) {
        Some(lang) if !lang.is_empty() => lang.to_lowercase(),
        _ => detect_language(code).to_string(),
    }
}

/// `POST /api/v1/assist/detect`
pub async fn detect(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let code = required_code(req.code)?;

    let (language, confidence) = if code.trim().len() < MIN_DETECT_LEN {
        (FALLBACK_LANGUAGE.to_string(), "low")
    } else {
        let detected = detect_language(&code).to_string();
        let confidence = if detected == FALLBACK_LANGUAGE { "low" } else { "high" };
        (detected, confidence)
    };

    let suggestions: Vec<serde_json::Value> = state
        .registry
        .choices()
        .into_iter()
        .take(SUGGESTION_COUNT)
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();

    Ok(Json(serde_json::json!({
        "language": language,
        "confidence": confidence,
        "suggestions": suggestions,
    })))
}

/// `POST /api/v1/assist/explain` — rule-based, always available.
pub async fn explain(
    Json(req): Json<AssistRequest>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let code = required_code(req.code)?;
    let language = resolved_language(req.language.as_deref(), &code);
    let explanation = snipbin_core::assist::explain_code(&code, &language);
    Ok(Json(serde_json::json!({
        "explanation": explanation,
        "language": language,
        "ai_powered": false,
    })))
}

/// `POST /api/v1/assist/complete` — remote backend when configured.
pub async fn complete(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let code = required_code(req.code)?;
    let language = resolved_language(req.language.as_deref(), &code);
    let completion = state.assistant.complete(&code, &language).await;
    Ok(Json(serde_json::json!({
        "available": completion.is_some(),
        "completion": completion,
        "language": language,
        "ai_powered": state.assistant.is_remote(),
    })))
}

/// `GET /api/v1/assist/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<serde_json::Value>, HttpError> {
    let available_models = state.assistant.available_models().await;
    Ok(Json(serde_json::json!({
        "ai_enabled": state.assistant.is_remote(),
        "available_models": available_models,
        "features": {
            "language_detection": true,
            "code_explanation": true,
            "code_completion": state.assistant.is_remote(),
        },
        "status": "ready",
        "default_language": DEFAULT_LANGUAGE,
    })))
}
