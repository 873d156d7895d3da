//! Remote inference backend over HTTP.
//!
//! Calls a hosted-model inference API with bounded timeouts. Every failure
//! mode (timeout, non-success status, transport error, unexpected payload)
//! degrades to the rule-based equivalents at the call site; nothing here
//! returns an error to callers.

use super::Assistant;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

/// Timeout for availability probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for generation requests.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted models by task.
const MODELS: &[(&str, &str)] = &[
    ("code_completion", "Salesforce/codegen-350M-mono"),
    ("code_explanation", "microsoft/CodeBERT-base"),
    ("text_generation", "microsoft/DialoGPT-small"),
];

/// Assistant backed by a remote inference API.
pub struct RemoteAssistant {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl RemoteAssistant {
    /// Build a remote assistant with its own HTTP client.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(token: String, base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AppError::StorageMessage(format!("HTTP client init failed: {}", err)))?;
        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn probe(&self, model: &str) -> bool {
        let result = self
            .client
            .get(self.model_url(model))
            .bearer_auth(&self.token)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!("Model probe for '{}' failed: {}", model, err);
                false
            }
        }
    }
}

#[async_trait]
impl Assistant for RemoteAssistant {
    fn is_remote(&self) -> bool {
        true
    }

    async fn available_models(&self) -> BTreeMap<String, String> {
        let mut available = BTreeMap::new();
        for (task, model) in MODELS {
            if self.probe(model).await {
                available.insert(task.to_string(), model.to_string());
            } else {
                tracing::debug!("Model {} for {} is not available", model, task);
            }
        }
        available
    }

    async fn complete(&self, code: &str, language: &str) -> Option<String> {
        let model = MODELS
            .iter()
            .find(|(task, _)| *task == "code_completion")
            .map(|(_, model)| *model)?;

        let payload = json!({
            "inputs": format!("# {}\n{}", language, code),
            "parameters": {
                "max_length": 100,
                "temperature": 0.7,
                "do_sample": true,
            },
        });

        let response = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.token)
            .timeout(GENERATE_TIMEOUT)
            .json(&payload)
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!("Completion request returned status {}", response.status());
                return None;
            }
            Err(err) => {
                tracing::warn!("Completion request failed: {}", err);
                return None;
            }
        };

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("Completion response was not JSON: {}", err);
                return None;
            }
        };

        body.as_array()
            .and_then(|items| items.first())
            .and_then(|item| item.get("generated_text"))
            .and_then(|text| text.as_str())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
