//! Groq adapter (OpenAI-compatible chat completions).
//!
//! Groq accepts every role natively, so messages are forwarded as-is. Its
//! error surface is structured: the HTTP status decides the failure kind.

use pipeline::{ChatMessage, LlmRequest, ProviderFailure, ProviderKind, Role};
use serde::{Deserialize, Serialize};

use crate::classify::{classify_status, classify_transport};
use crate::{LlmSetupError, ProviderConfig};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role,
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// HTTP client for Groq's chat completions endpoint.
#[derive(Debug)]
pub struct GroqClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl GroqClient {
    /// Builds the client and its HTTP connection pool.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmSetupError> {
        Ok(Self {
            http: crate::http_client(ProviderKind::Groq, config.timeout)?,
            config,
        })
    }

    /// Connection settings this client was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Sends one chat completion request and returns the first choice's text.
    ///
    /// A `null` content is returned as an empty string.
    pub async fn complete(&self, request: &LlmRequest) -> Result<String, ProviderFailure> {
        let model = self.config.resolve_model(request.model());
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatCompletionRequest {
            model: &model,
            messages: request.messages().iter().map(WireMessage::from).collect(),
            temperature: request.temperature(),
            max_tokens: request.max_tokens().as_u32(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(ProviderKind::Groq, &model, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(ProviderKind::Groq, &model, status, &text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| classify_transport(ProviderKind::Groq, &model, e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                ProviderFailure::new(
                    pipeline::FailureKind::UnknownError,
                    ProviderKind::Groq.as_str(),
                    &model,
                    "response contained no choices",
                )
            })
    }
}
