//! SOC Triage LLM provider infrastructure adapter.
//!
//! Implements the [`pipeline::LlmGateway`] trait for Groq and Google Gemini.
//! Providers are a closed set: a new backend is a new
//! [`pipeline::ProviderKind`] variant plus an adapter module here, never a
//! runtime registration.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting, response
//! parsing, and failure classification live here. The [`pipeline`] crate sees
//! only [`pipeline::LlmGateway`] and [`pipeline::ProviderFailure`].
//!
//! Nothing here retries, caches, or rate-limits. Each invocation is exactly one
//! outbound request; bounded waiting is the optional per-provider timeout.

use std::time::Duration;

use pipeline::ProviderKind;
use thiserror::Error;

pub mod classify;
pub mod config;
pub mod gateway;
pub mod gemini;
pub mod groq;

pub use config::{GatewayConfig, ProviderConfig};
pub use gateway::ProviderGateway;
pub use gemini::{combine_single_turn, GeminiClient};
pub use groq::GroqClient;

/// Errors raised while constructing provider clients.
#[derive(Debug, Error)]
pub enum LlmSetupError {
    /// The HTTP client for a provider could not be built (TLS backend, etc.).
    #[error("failed to build HTTP client for provider '{provider}': {source}")]
    HttpClient {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },
}

pub(crate) fn http_client(
    provider: ProviderKind,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, LlmSetupError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|source| LlmSetupError::HttpClient { provider, source })
}
