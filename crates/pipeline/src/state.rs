//! The analysis state threaded through every agent node.
//!
//! [`AnalysisState`] is a string-keyed map of JSON values. Nodes never mutate
//! it directly: each returns a [`StateUpdate`] and the executor folds that
//! delta in with [`AnalysisState::merge`]. Callers that accumulate the
//! executor's progress stream on their own side must use the same method so
//! their copy stays identical to the executor's.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Seed key holding the raw incident description.
pub const INPUT_TEXT: &str = "input_text";

/// Key holding the human-readable report once the pipeline completes.
pub const REPORT_TEXT: &str = "report_text";

/// Key holding the structured report once the pipeline completes.
pub const REPORT: &str = "report";

/// A partial update returned by one agent node.
pub type StateUpdate = Map<String, Value>;

/// Accumulated key/value results for one analysis run.
///
/// Append-only by convention: merges add or overwrite keys, never remove them.
/// The `input_text` seed is fixed at construction and no merge can change it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisState(Map<String, Value>);

impl AnalysisState {
    /// Creates a state seeded with the incident text.
    pub fn new(input_text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(INPUT_TEXT.to_string(), Value::String(input_text.into()));
        Self(map)
    }

    /// Wraps an existing map, e.g. a caller-supplied initial state carrying
    /// extra keys alongside `input_text`.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the incident text, if the seed is present and is a string.
    pub fn input_text(&self) -> Option<&str> {
        self.0.get(INPUT_TEXT).and_then(Value::as_str)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` has been written.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Folds `update` into this state by key-wise overwrite.
    ///
    /// Returns the keys that already held a value. An update to `input_text`
    /// is dropped when the seed exists and is reported as a collision too.
    pub fn merge(&mut self, update: StateUpdate) -> Vec<String> {
        let mut collisions = Vec::new();
        for (key, value) in update {
            if key == INPUT_TEXT && self.0.contains_key(INPUT_TEXT) {
                collisions.push(key);
                continue;
            }
            if self.0.insert(key.clone(), value).is_some() {
                collisions.push(key);
            }
        }
        collisions
    }

    /// Returns the rendered report text, once the report node has run.
    pub fn report_text(&self) -> Option<&str> {
        self.0.get(REPORT_TEXT).and_then(Value::as_str)
    }

    /// Returns the structured report, once the report node has run.
    pub fn report(&self) -> Option<&Map<String, Value>> {
        self.0.get(REPORT).and_then(Value::as_object)
    }

    /// Returns `true` when the terminal contract holds: `report_text` is a
    /// non-empty string and `report` is a mapping.
    pub fn is_complete(&self) -> bool {
        self.report_text().is_some_and(|t| !t.is_empty()) && self.report().is_some()
    }

    /// Iterates the keys present, in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(value: Value) -> StateUpdate {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn new_state_holds_only_the_seed() {
        let state = AnalysisState::new("suspicious login");
        assert_eq!(state.input_text(), Some("suspicious login"));
        assert_eq!(state.keys().collect::<Vec<_>>(), vec![INPUT_TEXT]);
        assert!(!state.is_complete());
    }

    #[test]
    fn merge_overwrites_and_reports_collisions() {
        let mut state = AnalysisState::new("x");
        assert!(state.merge(update(json!({"iocs": [1]}))).is_empty());

        let collisions = state.merge(update(json!({"iocs": [2], "mitre": {}})));
        assert_eq!(collisions, vec!["iocs".to_string()]);
        assert_eq!(state.get("iocs"), Some(&json!([2])));
        assert!(state.contains_key("mitre"));
    }

    #[test]
    fn merge_never_changes_input_text() {
        let mut state = AnalysisState::new("original");
        let collisions = state.merge(update(json!({"input_text": "replaced"})));
        assert_eq!(collisions, vec![INPUT_TEXT.to_string()]);
        assert_eq!(state.input_text(), Some("original"));
    }

    #[test]
    fn completeness_requires_text_and_mapping() {
        let mut state = AnalysisState::new("x");
        state.merge(update(json!({"report_text": "R", "report": []})));
        assert!(!state.is_complete());
        state.merge(update(json!({"report": {"title": "t"}})));
        assert!(state.is_complete());
    }
}
