//! The [`AgentNode`] port: one LLM-backed analysis step.

use async_trait::async_trait;

use crate::{AnalysisState, LlmGateway, NodeError, StateUpdate};

/// One stage of the analysis pipeline.
///
/// A node reads the accumulated [`AnalysisState`], makes exactly one call
/// through the [`LlmGateway`], decodes the answer, and returns a partial
/// update. It never mutates the state and never catches or retries failures.
///
/// `requires` and `produces` declare the node's data contract. The executor
/// checks at construction that every required key is populated by an earlier
/// node (or is the `input_text` seed) and warns when two nodes produce the
/// same key, since a later merge would silently overwrite the earlier value.
#[async_trait]
pub trait AgentNode: Send + Sync {
    /// Stable node name, yielded with every progress update.
    fn name(&self) -> &'static str;

    /// State keys this node reads.
    fn requires(&self) -> &'static [&'static str];

    /// State keys this node writes.
    fn produces(&self) -> &'static [&'static str];

    /// Runs the node against the current state.
    async fn run(
        &self,
        state: &AnalysisState,
        gateway: &dyn LlmGateway,
    ) -> Result<StateUpdate, NodeError>;
}
