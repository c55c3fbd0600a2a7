//! Chat-completion backend adapter.
//!
//! Speaks the OpenAI-compatible `POST /chat/completions` contract, which both
//! OpenAI and Perplexity accept.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::GenerationConfig;
use crate::shared::constants::NO_CONTENT_SENTINEL;

/// One completion call, with every option already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub model: String,
}

/// Failures surfaced by a backend adapter
#[derive(Debug, Error)]
pub enum BackendError {
    /// The provider answered with a non-success status, or a body that was not JSON
    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request could not be sent or the response could not be read
    #[error("Backend request failed: {0}")]
    Network(String),
}

/// A hosted text-generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Model used when the caller does not pick one
    fn default_model(&self) -> &str;

    /// Send the prompt and return the text of the first choice.
    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the provider sent any
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// HTTP client for OpenAI-compatible chat completion APIs
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    default_model: String,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("frayma-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            default_model: config.default_model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleClient {
    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            "POST {} (model={}, max_tokens={}, temperature={})",
            self.endpoint,
            request.model,
            request.max_tokens,
            request.temperature
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat completion request failed: {:?}", e);
                BackendError::Network(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!("Chat completion returned status {}", status);
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to decode chat completion response: {}", e);
            BackendError::Http {
                status: status.as_u16(),
                body: text.clone(),
            }
        })?;

        Ok(parsed
            .into_content()
            .unwrap_or_else(|| NO_CONTENT_SENTINEL.to_string()))
    }
}
