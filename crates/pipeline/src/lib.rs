//! Core orchestration domain for SOC Triage.
//!
//! This crate contains every domain concept shared across the workspace: the
//! analysis state threaded through the agent nodes, the provider failure
//! taxonomy, the stage machine, the response decoder, and the two port traits
//! ([`LlmGateway`], [`AgentNode`]) that infrastructure and orchestration
//! crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`NodeName`, `ModelName`, `PipelineRunId`) |
//! | [`types`] | Shared value types (`TokenCount`, `Timestamp`) |
//! | [`errors`] | Failure taxonomy, node and pipeline errors |
//! | [`state`] | `AnalysisState` and its merge rule |
//! | [`stage`] | The linear `PipelineStage` machine |
//! | [`llm`] | Request types and the `LlmGateway` port |
//! | [`node`] | The `AgentNode` port |
//! | [`decode`] | JSON payload extraction from model output |

pub mod decode;
pub mod errors;
pub mod identifiers;
pub mod llm;
pub mod node;
pub mod stage;
pub mod state;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use decode::extract_json_block;
pub use errors::{FailureKind, NodeError, PipelineError, ProviderFailure};
pub use identifiers::{ModelName, NodeName, PipelineRunId};
pub use llm::{
    ChatMessage, LlmGateway, LlmRequest, ProviderKind, Role, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use node::AgentNode;
pub use stage::PipelineStage;
pub use state::{AnalysisState, StateUpdate, INPUT_TEXT, REPORT, REPORT_TEXT};
pub use types::{Timestamp, TokenCount};
