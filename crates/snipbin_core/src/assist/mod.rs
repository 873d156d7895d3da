//! Code assistant: rule-based helpers plus an optional remote backend.
//!
//! The remote backend is selected once at startup based on credential
//! presence; everything else (detection, explanation) is pure and always
//! available. Remote failures degrade to `None`, never to an error.

/// Remote HTTP backend.
pub mod remote;
/// Rule-based summarizer.
pub mod rules;

use crate::config::Config;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use remote::RemoteAssistant;
pub use rules::explain_code;

/// Interface over the optional AI collaborator.
///
/// Implementations must never surface transport failures to callers.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Whether a remote credential is configured.
    fn is_remote(&self) -> bool;

    /// Probe the configured models and return the reachable ones by task.
    ///
    /// The offline implementation returns an empty map without any network
    /// I/O.
    async fn available_models(&self) -> BTreeMap<String, String>;

    /// Generate a code continuation.
    ///
    /// # Returns
    /// Generated text, or `None` when the backend is unconfigured, times
    /// out, or fails in any way.
    async fn complete(&self, code: &str, language: &str) -> Option<String>;
}

/// Assistant used when no credential is configured; all remote features are
/// permanently unavailable and no network I/O is ever attempted.
#[derive(Debug, Default)]
pub struct OfflineAssistant;

#[async_trait]
impl Assistant for OfflineAssistant {
    fn is_remote(&self) -> bool {
        false
    }

    async fn available_models(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    async fn complete(&self, _code: &str, _language: &str) -> Option<String> {
        None
    }
}

/// Select the assistant implementation from configuration.
///
/// A present `ai_api_token` yields the remote backend; anything else (absent
/// token, client construction failure) yields [`OfflineAssistant`].
pub fn assistant_from_config(config: &Config) -> Arc<dyn Assistant> {
    match &config.ai_api_token {
        Some(token) => match RemoteAssistant::new(token.clone(), config.ai_base_url.clone()) {
            Ok(assistant) => Arc::new(assistant),
            Err(err) => {
                tracing::warn!("Failed to build remote assistant: {}; running offline", err);
                Arc::new(OfflineAssistant)
            }
        },
        None => Arc::new(OfflineAssistant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> Config {
        Config {
            db_path: "unused".to_string(),
            port: 0,
            max_paste_size: 1024,
            languages_path: "unused".to_string(),
            ai_api_token: token.map(str::to_string),
            ai_base_url: "http://127.0.0.1:9".to_string(),
        }
    }

    #[tokio::test]
    async fn offline_assistant_short_circuits() {
        let assistant = OfflineAssistant;
        assert!(!assistant.is_remote());
        assert!(assistant.available_models().await.is_empty());
        assert_eq!(assistant.complete("code", "python").await, None);
    }

    #[test]
    fn credential_presence_selects_implementation() {
        let offline = assistant_from_config(&config_with_token(None));
        assert!(!offline.is_remote());

        let remote = assistant_from_config(&config_with_token(Some("tok")));
        assert!(remote.is_remote());
    }
}
