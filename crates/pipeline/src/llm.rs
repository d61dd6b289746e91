//! LLM request types and the [`LlmGateway`] port.
//!
//! The domain describes *what* it wants from a model (role-tagged messages,
//! a provider, sampling bounds); the `llm` crate decides *how* each backend is
//! spoken to. Providers form a closed set: adding one means adding a
//! [`ProviderKind`] variant and an adapter, never runtime registration.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ModelName, ProviderFailure, TokenCount};

/// Default sampling temperature for agent calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default max-output-token bound for agent calls.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Author role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole exchange.
    System,
    /// Content supplied on behalf of the analyst.
    User,
    /// A previous model turn.
    Assistant,
}

/// One role-tagged message of an [`LlmRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// Message text, sent verbatim.
    pub content: String,
}

impl ChatMessage {
    /// Creates a [`Role::System`] message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a [`Role::User`] message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a [`Role::Assistant`] message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// The closed set of supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq's OpenAI-compatible chat completions API.
    Groq,
    /// Google Gemini `generateContent` API. Has no system role.
    Gemini,
}

impl ProviderKind {
    /// Every supported provider.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Groq, ProviderKind::Gemini];

    /// Returns the lowercase provider name.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Comma-separated list of supported provider names.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderFailure;

    /// Parses a provider name case-insensitively. Anything outside the
    /// supported set is an `unknown_provider` failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(ProviderFailure::unknown_provider(s, "unspecified")),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single-turn request to an LLM provider.
///
/// Immutable once built. The message list is never empty: [`LlmRequest::new`]
/// refuses to construct a request without messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    messages: Vec<ChatMessage>,
    provider: ProviderKind,
    model: Option<ModelName>,
    temperature: f32,
    max_tokens: TokenCount,
}

impl LlmRequest {
    /// Creates a request with default sampling settings.
    ///
    /// Returns `None` if `messages` is empty.
    pub fn new(provider: ProviderKind, messages: Vec<ChatMessage>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }
        Some(Self {
            messages,
            provider,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: TokenCount::new(DEFAULT_MAX_TOKENS),
        })
    }

    /// Creates the system + user request every agent node sends.
    pub fn single_turn(
        provider: ProviderKind,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            provider,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: TokenCount::new(DEFAULT_MAX_TOKENS),
        }
    }

    /// Overrides the provider's default model.
    #[must_use]
    pub fn with_model(mut self, model: Option<ModelName>) -> Self {
        self.model = model;
        self
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overrides the max-output-token bound.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: TokenCount) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns the messages in send order. Never empty.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the backend this request is addressed to.
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Returns the model override, if any.
    pub fn model(&self) -> Option<&ModelName> {
        self.model.as_ref()
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the max-output-token bound.
    pub fn max_tokens(&self) -> TokenCount {
        self.max_tokens
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Issues one LLM call and returns the model's text, or a classified failure.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry, cache, or rate-limit locally.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn invoke(&self, request: LlmRequest) -> Result<String, ProviderFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("GROQ".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(" gemini ".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    }

    #[test]
    fn unsupported_provider_is_unknown_provider_failure() {
        let err = "openai".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err.kind, FailureKind::UnknownProvider);
        assert_eq!(err.provider, "openai");
    }

    #[test]
    fn request_requires_messages() {
        assert!(LlmRequest::new(ProviderKind::Groq, vec![]).is_none());

        let request = LlmRequest::new(ProviderKind::Gemini, vec![ChatMessage::user("hi")])
            .unwrap()
            .with_temperature(0.7)
            .with_max_tokens(TokenCount::new(64));
        assert_eq!(request.temperature(), 0.7);
        assert_eq!(request.max_tokens().as_u32(), 64);
        assert!(request.model().is_none());
    }
}
