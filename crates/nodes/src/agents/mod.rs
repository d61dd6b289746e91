//! The five agent nodes of the standard pipeline.
//!
//! Four of them (indicators, technique mapping, vulnerability lookup,
//! investigation) share one shape: render the keys they read into a user
//! prompt, call the model, decode a JSON value, store it under one key. They
//! are instances of [`AnalysisAgent`] parameterised by an [`AgentSpec`]. The
//! report node additionally renders `report_text` and lives in [`report`].

use async_trait::async_trait;
use pipeline::{
    extract_json_block, AgentNode, AnalysisState, LlmGateway, NodeError, StateUpdate, INPUT_TEXT,
};
use serde_json::Value;

use crate::NodeSettings;

pub mod cve;
pub mod investigation;
pub mod ioc;
pub mod mitre;
pub mod report;

pub use report::ReportAgent;

/// Characters of a raw response kept in a decode error.
const EXCERPT_CHARS: usize = 200;

/// Static description of one analysis node.
#[derive(Debug)]
pub struct AgentSpec {
    /// Node name, unique within the pipeline.
    pub name: &'static str,
    /// System message sent with every call.
    pub system_prompt: &'static str,
    /// Keys read, in the order they appear in the user prompt. Each is paired
    /// with the heading it is shown under.
    pub context: &'static [(&'static str, &'static str)],
    /// Keys that must be present before the node runs.
    pub requires: &'static [&'static str],
    /// Keys the node writes.
    pub produces: &'static [&'static str],
    /// Closing instruction appended after the context sections.
    pub task: &'static str,
}

/// A node that stores the model's decoded JSON under the key it produces.
#[derive(Debug)]
pub struct AnalysisAgent {
    spec: &'static AgentSpec,
    settings: NodeSettings,
}

impl AnalysisAgent {
    /// Binds `spec` to the call settings of one node.
    pub fn new(spec: &'static AgentSpec, settings: NodeSettings) -> Self {
        Self { spec, settings }
    }
}

#[async_trait]
impl AgentNode for AnalysisAgent {
    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn requires(&self) -> &'static [&'static str] {
        self.spec.requires
    }

    fn produces(&self) -> &'static [&'static str] {
        self.spec.produces
    }

    async fn run(
        &self,
        state: &AnalysisState,
        gateway: &dyn LlmGateway,
    ) -> Result<StateUpdate, NodeError> {
        let user = user_prompt(state, self.spec.context, self.spec.task)?;
        let raw = gateway
            .invoke(self.settings.request(self.spec.system_prompt, user))
            .await?;
        let value = decode_payload(&raw)?;

        let mut update = StateUpdate::new();
        for key in self.spec.produces {
            update.insert((*key).to_string(), value.clone());
        }
        Ok(update)
    }
}

/// Renders the context sections a node reads into its user prompt.
///
/// `input_text` is shown verbatim; every other key is shown as pretty JSON.
pub(crate) fn user_prompt(
    state: &AnalysisState,
    context: &[(&'static str, &'static str)],
    task: &str,
) -> Result<String, NodeError> {
    let mut prompt = String::new();
    for (key, heading) in context {
        let value = state
            .get(key)
            .ok_or(NodeError::MissingStateKey { key: *key })?;
        let body = match (*key, value) {
            (INPUT_TEXT, Value::String(text)) => text.clone(),
            _ => format!("{value:#}"),
        };
        prompt.push_str(&format!("## {heading}\n{body}\n\n"));
    }
    prompt.push_str(task);
    Ok(prompt)
}

/// Runs the response decoder and parses the candidate as JSON.
pub(crate) fn decode_payload(raw: &str) -> Result<Value, NodeError> {
    let candidate = extract_json_block(raw);
    serde_json::from_str(&candidate).map_err(|e| NodeError::Decode {
        message: e.to_string(),
        excerpt: excerpt(raw),
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_shows_input_verbatim_and_other_keys_as_json() {
        let mut state = AnalysisState::new("failed logins from 10.0.0.5");
        state.merge(json!({"iocs": {"ips": ["10.0.0.5"]}}).as_object().cloned().unwrap());

        let prompt = user_prompt(
            &state,
            &[(INPUT_TEXT, "Incident"), ("iocs", "Indicators")],
            "Do it.",
        )
        .unwrap();

        assert!(prompt.starts_with("## Incident\nfailed logins from 10.0.0.5\n\n## Indicators\n"));
        assert!(prompt.contains("\"10.0.0.5\""));
        assert!(prompt.ends_with("Do it."));
    }

    #[test]
    fn missing_context_key_is_reported() {
        let state = AnalysisState::new("x");
        let err = user_prompt(&state, &[("mitre", "Techniques")], "").unwrap_err();
        assert!(matches!(err, NodeError::MissingStateKey { key: "mitre" }));
    }

    #[test]
    fn decode_accepts_wrapped_json_and_rejects_prose() {
        let value = decode_payload("Sure! ```json\n{\"a\": [1]}\n``` hope this helps").unwrap();
        assert_eq!(value, json!({"a": [1]}));

        let err = decode_payload("I could not find anything.").unwrap_err();
        match err {
            NodeError::Decode { excerpt, .. } => assert_eq!(excerpt, "I could not find anything."),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn excerpt_is_bounded() {
        let long = "y".repeat(EXCERPT_CHARS * 2);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS + 3);
    }
}
