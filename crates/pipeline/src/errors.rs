//! Failure taxonomy and top-level error types for the SOC Triage pipeline.
//!
//! [`ProviderFailure`] is the single shape every LLM backend fault is reduced
//! to, whatever the backend's native error surface looks like. [`NodeError`]
//! covers what can go wrong inside one agent node, and [`PipelineError`] is
//! what the executor surfaces to its caller.
//!
//! No layer in this workspace retries. Errors are classified once, at the
//! provider adapter, and then propagate unmodified to the pipeline boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{NodeName, PipelineStage};

// ---------------------------------------------------------------------------
// Provider failure taxonomy
// ---------------------------------------------------------------------------

/// Classification of a provider-originated fault.
///
/// The taxonomy is flat. Adapters with a structured
/// error surface map onto it directly; the others go through the keyword
/// heuristic in the `llm` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Usage or quota exhaustion on the provider side.
    RateLimit,
    /// The provider service rejected or failed the request (status error).
    ApiError,
    /// The call failed for a reason that matched no other category
    /// (transport failure, unrecognised provider error).
    GenericError,
    /// The provider answered successfully but the answer could not be read.
    UnknownError,
    /// The caller named a provider outside the supported set, or one this
    /// gateway has no credentials for. No network call was made.
    UnknownProvider,
}

impl FailureKind {
    /// Returns the snake_case tag used in logs and serialised reports.
    pub fn as_tag(self) -> &'static str {
        match self {
            FailureKind::RateLimit => "rate_limit",
            FailureKind::ApiError => "api_error",
            FailureKind::GenericError => "generic_error",
            FailureKind::UnknownError => "unknown_error",
            FailureKind::UnknownProvider => "unknown_provider",
        }
    }

    /// Returns `true` if an operator can act on the failure (wait, rotate
    /// credentials, check provider status) rather than fix code.
    pub fn is_user_actionable(self) -> bool {
        !matches!(self, FailureKind::UnknownProvider)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A classified fault originating from an LLM backend call.
///
/// Carries everything a boundary needs to explain the failure: which provider,
/// which model, and the upstream detail verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} from provider '{provider}' (model '{model}'): {detail}")]
pub struct ProviderFailure {
    /// Category of the failure.
    pub kind: FailureKind,
    /// Name of the provider the call was addressed to.
    pub provider: String,
    /// Model identifier in use when the failure occurred.
    pub model: String,
    /// Upstream error detail, unmodified.
    pub detail: String,
}

impl ProviderFailure {
    /// Creates a new [`ProviderFailure`].
    pub fn new(
        kind: FailureKind,
        provider: impl Into<String>,
        model: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider: provider.into(),
            model: model.into(),
            detail: detail.into(),
        }
    }

    /// Failure for a provider name outside the supported set.
    pub fn unknown_provider(provider: impl Into<String>, model: impl Into<String>) -> Self {
        let provider = provider.into();
        let detail = format!(
            "unsupported provider '{provider}'; supported providers: {}",
            crate::ProviderKind::supported_names()
        );
        Self::new(FailureKind::UnknownProvider, provider, model, detail)
    }
}

// ---------------------------------------------------------------------------
// Node-level errors
// ---------------------------------------------------------------------------

/// Errors raised inside a single agent node.
///
/// Nodes never catch or retry; whatever goes wrong is returned as-is and the
/// executor attaches the node name and stage.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderFailure),

    /// The decoded response could not be parsed as JSON.
    #[error("response is not valid JSON ({message}); response starts with: {excerpt}")]
    Decode {
        /// Parser error message.
        message: String,
        /// Leading part of the raw response, for diagnosis.
        excerpt: String,
    },

    /// The response parsed but does not have the shape the node needs.
    #[error("expected {expected} in the response, got {found}")]
    UnexpectedShape {
        /// What the node needed (e.g. `"a JSON object"`).
        expected: &'static str,
        /// What it received (e.g. `"array"`).
        found: &'static str,
    },

    /// The analysis state lacks a key this node reads.
    #[error("analysis state has no '{key}' entry")]
    MissingStateKey {
        /// The missing key.
        key: &'static str,
    },
}

impl NodeError {
    /// Returns the underlying provider failure, if this error is one.
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            NodeError::Provider(failure) => Some(failure),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that stop a pipeline run.
///
/// A run never recovers from any of these. The caller decides whether the
/// state accumulated before the fault is still worth keeping.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An agent node failed; the run stopped at `stage`.
    #[error("node '{node}' failed after stage '{stage}': {source}")]
    Node {
        /// The node that failed.
        node: NodeName,
        /// The last stage completed before the failure.
        stage: PipelineStage,
        /// What went wrong inside the node.
        #[source]
        source: NodeError,
    },

    /// The initial state handed to the executor has no `input_text`.
    #[error("initial analysis state has no 'input_text' entry")]
    MissingInput,

    /// The pipeline wiring is invalid (node order, dependencies, node count).
    ///
    /// Produced at construction time; a run never starts with an invalid graph.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl PipelineError {
    /// Returns the classified provider failure behind this error, if any.
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            PipelineError::Node { source, .. } => source.provider_failure(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kind_serialises_as_snake_case_tag() {
        let json = serde_json::to_string(&FailureKind::RateLimit).unwrap();
        assert_eq!(json, "\"rate_limit\"");
        assert_eq!(FailureKind::UnknownProvider.to_string(), "unknown_provider");
    }

    #[test]
    fn unknown_provider_lists_supported_names() {
        let failure = ProviderFailure::unknown_provider("openai", "gpt-4o");
        assert_eq!(failure.kind, FailureKind::UnknownProvider);
        assert!(failure.detail.contains("groq"));
        assert!(failure.detail.contains("gemini"));
        assert!(!failure.kind.is_user_actionable());
    }

    #[test]
    fn pipeline_error_exposes_provider_failure() {
        let failure = ProviderFailure::new(FailureKind::RateLimit, "groq", "m", "quota");
        let err = PipelineError::Node {
            node: NodeName::new("cve").unwrap(),
            stage: PipelineStage::MitreDone,
            source: NodeError::from(failure.clone()),
        };
        assert_eq!(err.provider_failure(), Some(&failure));
        assert!(PipelineError::MissingInput.provider_failure().is_none());
    }
}
