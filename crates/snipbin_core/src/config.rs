//! Configuration loading from environment variables.

use std::env;

/// Default HTTP port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8750;

/// Default maximum paste size accepted by the API, in bytes.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 1_000_000;

/// Runtime configuration for Snipbin.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Path of the language registry JSON resource.
    pub languages_path: String,
    /// Credential for the remote AI backend; absence disables network calls.
    pub ai_api_token: Option<String>,
    pub ai_base_url: String,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "data/snipbin".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            languages_path: env::var("LANGUAGES_PATH")
                .unwrap_or_else(|_| "languages.json".to_string()),
            ai_api_token: env::var("AI_API_TOKEN").ok().and_then(non_empty),
            ai_base_url: env::var("AI_BASE_URL")
                .ok()
                .and_then(non_empty)
                .unwrap_or_else(|| "https://api-inference.huggingface.co/models".to_string()),
        }
    }
}
