//! Per-node LLM call settings.

use std::collections::BTreeSet;

use pipeline::{
    LlmRequest, ModelName, ProviderKind, TokenCount, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use serde::{Deserialize, Serialize};

/// How one node calls its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Backend the node's call is routed to.
    pub provider: ProviderKind,
    /// `None` uses the provider's configured default model.
    pub model: Option<ModelName>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl NodeSettings {
    /// Default settings routed to `provider`.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Builds the system + user request for this node.
    pub fn request(&self, system: &str, user: String) -> LlmRequest {
        LlmRequest::single_turn(self.provider, system, user)
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(TokenCount::new(self.max_tokens))
    }
}

/// Settings for every node of the standard pipeline.
///
/// Indicator extraction, technique mapping and report writing default to
/// Groq; vulnerability lookup and investigation default to Gemini.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Indicator extraction.
    pub ioc: NodeSettings,
    /// ATT&CK technique mapping.
    pub mitre: NodeSettings,
    /// Vulnerability lookup.
    pub cve: NodeSettings,
    /// Investigation synthesis.
    pub investigation: NodeSettings,
    /// Final report.
    pub report: NodeSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            ioc: NodeSettings::new(ProviderKind::Groq),
            mitre: NodeSettings::new(ProviderKind::Groq),
            cve: NodeSettings::new(ProviderKind::Gemini),
            investigation: NodeSettings::new(ProviderKind::Gemini),
            report: NodeSettings::new(ProviderKind::Groq),
        }
    }
}

impl PipelineSettings {
    /// Routes every node to `provider`, dropping per-node model overrides
    /// (they name models of the previous provider).
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        for node in self.nodes_mut() {
            node.provider = provider;
            node.model = None;
        }
        self
    }

    /// Providers at least one node calls. Each needs credentials at startup.
    pub fn providers_in_use(&self) -> BTreeSet<&'static str> {
        self.nodes().into_iter().map(|n| n.provider.as_str()).collect()
    }

    /// Returns `true` if any node routes to `provider`.
    pub fn uses(&self, provider: ProviderKind) -> bool {
        self.nodes().into_iter().any(|n| n.provider == provider)
    }

    fn nodes(&self) -> [&NodeSettings; 5] {
        [&self.ioc, &self.mitre, &self.cve, &self.investigation, &self.report]
    }

    fn nodes_mut(&mut self) -> [&mut NodeSettings; 5] {
        [
            &mut self.ioc,
            &mut self.mitre,
            &mut self.cve,
            &mut self.investigation,
            &mut self.report,
        ]
    }
}
