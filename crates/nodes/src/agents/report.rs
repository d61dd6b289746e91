//! Final report generation.
//!
//! The model writes the structured report; the human-readable text is
//! rendered locally from it, so `report_text` is never empty and never
//! disagrees with `report`.

use async_trait::async_trait;
use pipeline::{
    AgentNode, AnalysisState, LlmGateway, NodeError, StateUpdate, INPUT_TEXT, REPORT, REPORT_TEXT,
};
use serde_json::Value;

use super::cve::CVES;
use super::investigation::INVESTIGATION;
use super::ioc::IOCS;
use super::mitre::MITRE;
use super::{decode_payload, json_kind, user_prompt};
use crate::{render_report, NodeSettings};

const CONTEXT: &[(&str, &str)] = &[
    (INPUT_TEXT, "Incident description"),
    (IOCS, "Extracted indicators"),
    (MITRE, "Mapped ATT&CK techniques"),
    (CVES, "Related vulnerabilities"),
    (INVESTIGATION, "Investigation findings"),
];

const REQUIRES: &[&str] = &[INPUT_TEXT, IOCS, MITRE, CVES, INVESTIGATION];
const PRODUCES: &[&str] = &[REPORT, REPORT_TEXT];

const TASK: &str = "Write the final incident report from the material above. \
                    Respond with the JSON object only.";

const SYSTEM_PROMPT: &str = r#"You are a SOC team lead writing the final incident report for management and the response team.

Be factual and concise. Reuse the indicators, techniques and vulnerabilities you were given; do not introduce new ones.

Respond with a single JSON object, no commentary:
{
  "title": "short incident title",
  "severity": "low|medium|high|critical",
  "summary": "executive summary",
  "indicators": [],
  "mitre_techniques": [{"id": "", "name": "", "tactic": ""}],
  "cves": [{"id": "", "relevance": ""}],
  "timeline": [{"time": "", "event": ""}],
  "impact": "business and technical impact",
  "recommendations": [],
  "conclusion": ""
}"#;

/// Writes `report` (structured) and `report_text` (rendered).
#[derive(Debug)]
pub struct ReportAgent {
    settings: NodeSettings,
}

impl ReportAgent {
    /// Creates the report node with its call settings.
    pub fn new(settings: NodeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AgentNode for ReportAgent {
    fn name(&self) -> &'static str {
        "report"
    }

    fn requires(&self) -> &'static [&'static str] {
        REQUIRES
    }

    fn produces(&self) -> &'static [&'static str] {
        PRODUCES
    }

    async fn run(
        &self,
        state: &AnalysisState,
        gateway: &dyn LlmGateway,
    ) -> Result<StateUpdate, NodeError> {
        let user = user_prompt(state, CONTEXT, TASK)?;
        let raw = gateway
            .invoke(self.settings.request(SYSTEM_PROMPT, user))
            .await?;

        let report = match decode_payload(&raw)? {
            Value::Object(map) => map,
            other => {
                return Err(NodeError::UnexpectedShape {
                    expected: "a JSON object",
                    found: json_kind(&other),
                })
            }
        };

        let mut update = StateUpdate::new();
        update.insert(REPORT_TEXT.to_string(), Value::String(render_report(&report)));
        update.insert(REPORT.to_string(), Value::Object(report));
        Ok(update)
    }
}
