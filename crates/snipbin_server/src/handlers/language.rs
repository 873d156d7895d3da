//! Language registry endpoint.

use crate::error::HttpError;
use crate::AppState;
use axum::extract::State;
use axum::Json;

/// `GET /api/v1/languages`
///
/// Returns the registry entries plus the ordered `(id, name)` choices used to
/// populate selection UIs.
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let choices: Vec<serde_json::Value> = state
        .registry
        .choices()
        .into_iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    Ok(Json(serde_json::json!({
        "languages": state.registry.languages(),
        "categories": state.registry.categories(),
        "choices": choices,
    })))
}
