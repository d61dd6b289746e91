//! The [`ProviderGateway`]: one entry point for every supported backend.

use async_trait::async_trait;
use pipeline::{FailureKind, LlmGateway, LlmRequest, ProviderFailure, ProviderKind};
use tracing::Instrument;

use crate::{GatewayConfig, GeminiClient, GroqClient, LlmSetupError};

/// Dispatches requests to the adapter for their [`ProviderKind`].
///
/// Providers without configuration are disabled; requests for them fail with
/// `unknown_provider` before any network activity.
#[derive(Debug)]
pub struct ProviderGateway {
    groq: Option<GroqClient>,
    gemini: Option<GeminiClient>,
}

impl ProviderGateway {
    /// Builds a gateway with one HTTP client per enabled provider.
    pub fn new(config: GatewayConfig) -> Result<Self, LlmSetupError> {
        Ok(Self {
            groq: config.groq.map(GroqClient::new).transpose()?,
            gemini: config.gemini.map(GeminiClient::new).transpose()?,
        })
    }

    /// Returns `true` if requests for `provider` will reach the network.
    pub fn is_enabled(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Groq => self.groq.is_some(),
            ProviderKind::Gemini => self.gemini.is_some(),
        }
    }

    /// Model the request will be sent with: its override, else the provider's
    /// configured default. `None` when the provider is disabled and the
    /// request names no model.
    fn resolved_model(&self, request: &LlmRequest) -> Option<String> {
        let config = match request.provider() {
            ProviderKind::Groq => self.groq.as_ref().map(GroqClient::config),
            ProviderKind::Gemini => self.gemini.as_ref().map(GeminiClient::config),
        };
        match config {
            Some(config) => Some(config.resolve_model(request.model())),
            None => request.model().map(|m| m.as_str().to_string()),
        }
    }

    fn not_configured(request: &LlmRequest) -> ProviderFailure {
        let provider = request.provider();
        let model = request
            .model()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "unspecified".to_string());
        ProviderFailure::new(
            FailureKind::UnknownProvider,
            provider.as_str(),
            model,
            format!("provider '{provider}' is not configured in this gateway (no API key)"),
        )
    }
}

#[async_trait]
impl LlmGateway for ProviderGateway {
    async fn invoke(&self, request: LlmRequest) -> Result<String, ProviderFailure> {
        let span = tracing::info_span!(
            "llm_call",
            provider = %request.provider(),
            model = self.resolved_model(&request).as_deref().unwrap_or("unspecified"),
            messages = request.messages().len(),
            temperature = request.temperature(),
            max_tokens = request.max_tokens().as_u32(),
        );

        async {
            let result = match request.provider() {
                ProviderKind::Groq => match &self.groq {
                    Some(client) => client.complete(&request).await,
                    None => Err(Self::not_configured(&request)),
                },
                ProviderKind::Gemini => match &self.gemini {
                    Some(client) => client.complete(&request).await,
                    None => Err(Self::not_configured(&request)),
                },
            };

            match &result {
                Ok(text) => tracing::debug!(response_chars = text.len(), "llm call succeeded"),
                Err(failure) => tracing::warn!(
                    kind = %failure.kind,
                    model = %failure.model,
                    detail = %failure.detail,
                    "llm call failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}
