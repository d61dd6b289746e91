//! Per-provider connection settings.

use std::time::Duration;

use pipeline::{ModelName, ProviderKind};

/// Groq's OpenAI-compatible API root.
pub const GROQ_DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq model used when neither the request nor the config names one.
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Gemini REST API root.
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini model used when neither the request nor the config names one.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Connection settings for one provider.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Secret API key sent with every request.
    pub api_key: String,
    /// Model used when a request carries no override.
    pub default_model: String,
    /// API root, without trailing slash. Overridable for proxies and tests.
    pub base_url: String,
    /// Upper bound on one request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Creates settings for `provider` with its public endpoint and default model.
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        let (base_url, model) = match provider {
            ProviderKind::Groq => (GROQ_DEFAULT_BASE_URL, GROQ_DEFAULT_MODEL),
            ProviderKind::Gemini => (GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL),
        };
        Self {
            api_key: api_key.into(),
            default_model: model.to_string(),
            base_url: base_url.to_string(),
            timeout: None,
        }
    }

    /// Replaces the built-in default model.
    #[must_use]
    pub fn with_default_model(mut self, model: ModelName) -> Self {
        self.default_model = model.as_str().to_string();
        self
    }

    /// Returns the request's model override, or this provider's default.
    pub fn resolve_model(&self, requested: Option<&ModelName>) -> String {
        requested
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// Points the client at another API root, e.g. a proxy or mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bounds each request; `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

// The key never reaches logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for every provider the gateway may call.
///
/// A provider left as `None` is disabled: requests addressed to it fail with
/// `unknown_provider` without touching the network.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Groq settings; `None` disables Groq.
    pub groq: Option<ProviderConfig>,
    /// Gemini settings; `None` disables Gemini.
    pub gemini: Option<ProviderConfig>,
}

impl GatewayConfig {
    /// Returns the settings for `provider`, if it is enabled.
    pub fn provider(&self, provider: ProviderKind) -> Option<&ProviderConfig> {
        match provider {
            ProviderKind::Groq => self.groq.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
        }
    }
}
