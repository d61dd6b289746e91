//! Newtype identifiers for nodes, models and runs.
//!
//! A node name and a model name are both strings on the wire; keeping them in
//! distinct types stops one being passed where the other is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Non-blank string newtypes.
// Generates: struct, new() -> Option<Self>, as_str(), Display, and a serde
// representation that refuses blank strings on input.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// `None` when `value` is empty or whitespace only.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                (!value.trim().is_empty()).then_some(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
                    .ok_or_else(|| format!("{} must not be blank", stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Name of an agent node (`"ioc"`, `"report"`, ...). Unique within a
    /// pipeline; the first half of every progress item.
    NodeName
}

string_id! {
    /// Provider-specific model identifier, e.g. `llama-3.3-70b-versatile`.
    ModelName
}

/// Correlates all log output of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineRunId(Uuid);

impl PipelineRunId {
    /// Generates a fresh random (v4) run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PipelineRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(NodeName::new("").is_none());
        assert!(NodeName::new(" \t").is_none());
        assert_eq!(NodeName::new("ioc").map(|n| n.to_string()), Some("ioc".into()));
    }

    #[test]
    fn blank_names_do_not_deserialize() {
        let model: ModelName = serde_json::from_str("\"gemini-1.5-flash\"").unwrap();
        assert_eq!(model.as_str(), "gemini-1.5-flash");
        assert_eq!(serde_json::to_string(&model).unwrap(), "\"gemini-1.5-flash\"");

        let err = serde_json::from_str::<ModelName>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("ModelName must not be blank"));
    }

    #[test]
    fn run_ids_are_unique_and_compact() {
        let id = PipelineRunId::new_random();
        assert_ne!(id, PipelineRunId::new_random());
        assert_eq!(id.to_string().len(), 32);
    }
}
