//! OpenRouter chat-completions client

use crate::wire::{first_content, ChatRequest};
use crate::{strip_fences, ClientError, GenerationClient, DEFAULT_MODEL};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use useai_directive::Metadata;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default transport timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const REFERER: &str = env!("CARGO_PKG_REPOSITORY");
const TITLE: &str = "use-ai";

/// Settings for [`OpenRouterClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Bearer credential
    pub api_key: String,
    /// Chat-completions URL
    pub endpoint: String,
    /// Model used when the metadata names none
    pub default_model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ClientSettings {
    /// Settings with defaults for everything but the credential
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With default model
    #[inline]
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// With timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`GenerationClient`] for OpenRouter-compatible services
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    settings: ClientSettings,
}

impl OpenRouterClient {
    /// Create client
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] for an empty credential and
    /// [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        if settings.api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        let client = Client::builder()
            .user_agent(concat!("useai/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait]
impl GenerationClient for OpenRouterClient {
    #[instrument(skip_all, fields(model = metadata.model.as_deref().unwrap_or(&self.settings.default_model)))]
    async fn generate(&self, prompt: &str, metadata: &Metadata) -> Result<String, ClientError> {
        let request = ChatRequest::from_metadata(prompt, metadata, &self.settings.default_model);
        debug!(endpoint = %self.settings.endpoint, "sending generation request");

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)?;
        let content = first_content(&payload).ok_or_else(|| ClientError::InvalidResponse {
            payload: payload.to_string(),
        })?;

        debug!(len = content.len(), "received generated code");
        Ok(strip_fences(content))
    }
}
