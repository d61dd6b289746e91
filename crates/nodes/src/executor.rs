//! The [`PipelineExecutor`]: drives the five agent nodes in order.
//!
//! A run is exposed as a lazy [`Stream`] of [`NodeCompletion`]s. Each item is
//! produced only after its node's call returned and its update was merged into
//! the executor's own copy of the state, so a consumer sees progress node by
//! node. The first failure is yielded as the stream's last item.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use pipeline::{
    AgentNode, AnalysisState, LlmGateway, NodeName, PipelineError, PipelineRunId, PipelineStage,
    StateUpdate, Timestamp, INPUT_TEXT,
};
use tracing::Instrument;

use crate::agents::{cve, investigation, ioc, mitre, AnalysisAgent, ReportAgent};
use crate::PipelineSettings;

/// One progress item: a node finished and this is what it added.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCompletion {
    /// Node that finished.
    pub node: NodeName,
    /// Keys the node wrote.
    pub update: StateUpdate,
    /// Stage the run reached with this node.
    pub stage: PipelineStage,
    /// When the update was merged.
    pub completed_at: Timestamp,
}

/// Executes the fixed, strictly sequential agent pipeline.
pub struct PipelineExecutor {
    gateway: Arc<dyn LlmGateway>,
    nodes: Vec<(NodeName, Arc<dyn AgentNode>)>,
}

/// Per-run progress carried between stream steps.
struct RunCursor {
    state: AnalysisState,
    next: usize,
    stage: PipelineStage,
}

impl PipelineExecutor {
    /// Wires the standard pipeline: ioc → mitre → cve → investigation → report.
    pub fn standard(
        gateway: Arc<dyn LlmGateway>,
        settings: &PipelineSettings,
    ) -> Result<Self, PipelineError> {
        let nodes: Vec<Arc<dyn AgentNode>> = vec![
            Arc::new(AnalysisAgent::new(&ioc::SPEC, settings.ioc.clone())),
            Arc::new(AnalysisAgent::new(&mitre::SPEC, settings.mitre.clone())),
            Arc::new(AnalysisAgent::new(&cve::SPEC, settings.cve.clone())),
            Arc::new(AnalysisAgent::new(
                &investigation::SPEC,
                settings.investigation.clone(),
            )),
            Arc::new(ReportAgent::new(settings.report.clone())),
        ];
        Self::new(gateway, nodes)
    }

    /// Wires `nodes` in the given order after validating the graph.
    ///
    /// Fails when the node count does not match the stage machine, when a name
    /// is blank or repeated, or when a node requires a key that neither the
    /// seed nor an earlier node provides. Two nodes producing the same key is
    /// allowed but logged, since the later merge silently overwrites.
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        nodes: Vec<Arc<dyn AgentNode>>,
    ) -> Result<Self, PipelineError> {
        if nodes.len() != PipelineStage::TRANSITIONS {
            return Err(configuration(format!(
                "pipeline needs exactly {} nodes, got {}",
                PipelineStage::TRANSITIONS,
                nodes.len()
            )));
        }

        let mut available: HashSet<&'static str> = HashSet::from([INPUT_TEXT]);
        let mut producers: HashMap<&'static str, &'static str> = HashMap::new();
        let mut named: Vec<(NodeName, Arc<dyn AgentNode>)> = Vec::with_capacity(nodes.len());

        for node in nodes {
            let name = NodeName::new(node.name())
                .ok_or_else(|| configuration("node with a blank name".to_string()))?;
            if named.iter().any(|(existing, _)| existing == &name) {
                return Err(configuration(format!("duplicate node name '{name}'")));
            }

            if let Some(missing) = node.requires().iter().find(|k| !available.contains(*k)) {
                return Err(configuration(format!(
                    "node '{name}' requires '{missing}', which no earlier node produces"
                )));
            }

            for &key in node.produces() {
                if let Some(previous) = producers.insert(key, node.name()) {
                    tracing::warn!(
                        key,
                        first = previous,
                        second = %name,
                        "two nodes produce the same state key; the later one overwrites"
                    );
                }
                available.insert(key);
            }
            named.push((name, node));
        }

        Ok(Self {
            gateway,
            nodes: named,
        })
    }

    /// Node names in execution order.
    pub fn node_names(&self) -> impl Iterator<Item = &NodeName> {
        self.nodes.iter().map(|(name, _)| name)
    }

    /// Starts a run and returns its progress stream.
    ///
    /// The stream is finite and cannot be restarted. Dropping it abandons the
    /// run at the next suspension point. Consumers that keep their own copy
    /// of the state must fold each update in with [`AnalysisState::merge`].
    pub fn run(
        &self,
        initial: AnalysisState,
    ) -> impl Stream<Item = Result<NodeCompletion, PipelineError>> + Send + '_ {
        let run_id = PipelineRunId::new_random();
        let run_span = tracing::info_span!("pipeline_run", %run_id);
        let cursor = RunCursor {
            state: initial,
            next: 0,
            stage: PipelineStage::Start,
        };

        stream::try_unfold(cursor, move |cursor| {
            let span = run_span.clone();
            self.step(cursor).instrument(span)
        })
    }

    /// Drains a run, returning the final state.
    ///
    /// On failure the partial state is lost; use [`run`](Self::run) to keep it.
    pub async fn run_to_completion(
        &self,
        initial: AnalysisState,
    ) -> Result<AnalysisState, PipelineError> {
        let mut state = initial.clone();
        let progress = self.run(initial);
        futures::pin_mut!(progress);
        while let Some(completion) = progress.try_next().await? {
            state.merge(completion.update);
        }
        Ok(state)
    }

    async fn step(
        &self,
        mut cursor: RunCursor,
    ) -> Result<Option<(NodeCompletion, RunCursor)>, PipelineError> {
        let Some((name, node)) = self.nodes.get(cursor.next) else {
            tracing::info!(stage = %cursor.stage, "pipeline run finished");
            return Ok(None);
        };
        if cursor.next == 0 && cursor.state.input_text().is_none() {
            return Err(PipelineError::MissingInput);
        }

        let update = node
            .run(&cursor.state, self.gateway.as_ref())
            .instrument(tracing::info_span!("node", node = %name))
            .await
            .map_err(|source| {
                tracing::warn!(node = %name, stage = %cursor.stage, error = %source, "node failed");
                PipelineError::Node {
                    node: name.clone(),
                    stage: cursor.stage,
                    source,
                }
            })?;

        let collisions = cursor.state.merge(update.clone());
        if !collisions.is_empty() {
            tracing::warn!(node = %name, keys = ?collisions, "node overwrote existing state keys");
        }

        let stage = cursor.stage.next().ok_or_else(|| {
            configuration(format!("node '{name}' ran after the terminal stage"))
        })?;
        cursor.stage = stage;
        cursor.next += 1;
        tracing::info!(node = %name, %stage, keys = ?update.keys().collect::<Vec<_>>(), "node completed");

        let completion = NodeCompletion {
            node: name.clone(),
            update,
            stage,
            completed_at: Timestamp::now(),
        };
        Ok(Some((completion, cursor)))
    }
}

impl std::fmt::Debug for PipelineExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field("nodes", &self.node_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn configuration(message: String) -> PipelineError {
    PipelineError::Configuration { message }
}
