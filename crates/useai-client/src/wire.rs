//! Chat-completions wire types

use crate::DEFAULT_TEMPERATURE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use useai_directive::Metadata;

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role, always `user` for generation requests
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// User message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation, a single user message
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Reproducibility seed, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl ChatRequest {
    /// Build request from prompt and merged metadata
    ///
    /// Non-numeric temperatures fall back to the default, and seeds that are
    /// not integers are dropped; both cases are logged.
    #[must_use]
    pub fn from_metadata(prompt: &str, metadata: &Metadata, default_model: &str) -> Self {
        let model = metadata
            .model
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model.to_string());

        let temperature = match &metadata.temperature {
            None => DEFAULT_TEMPERATURE,
            Some(value) => value.as_f64().unwrap_or_else(|| {
                warn!(%value, "non-numeric temperature, using default");
                DEFAULT_TEMPERATURE
            }),
        };

        let seed = metadata.seed.as_ref().and_then(|value| {
            let seed = value.as_i64();
            if seed.is_none() {
                warn!(%value, "seed is not an integer, omitting");
            }
            seed
        });

        Self {
            model,
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            seed,
        }
    }
}

/// Extract `choices[0].message.content`, if present and non-empty
pub(crate) fn first_content(response: &Value) -> Option<&str> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
