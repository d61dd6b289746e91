//! Investigation synthesis.

use pipeline::INPUT_TEXT;

use super::cve::CVES;
use super::ioc::IOCS;
use super::mitre::MITRE;
use super::AgentSpec;

/// State key holding the investigation findings.
pub const INVESTIGATION: &str = "investigation";

/// Investigation synthesis node.
pub static SPEC: AgentSpec = AgentSpec {
    name: "investigation",
    system_prompt: SYSTEM_PROMPT,
    context: &[
        (INPUT_TEXT, "Incident description"),
        (IOCS, "Extracted indicators"),
        (MITRE, "Mapped ATT&CK techniques"),
        (CVES, "Related vulnerabilities"),
    ],
    requires: &[INPUT_TEXT, IOCS, MITRE, CVES],
    produces: &[INVESTIGATION],
    task: "Correlate the material above into investigation findings. \
           Respond with the JSON object only.",
};

const SYSTEM_PROMPT: &str = r#"You are the lead incident responder. Correlate the incident description, indicators, ATT&CK mapping and vulnerabilities into a coherent picture of what happened.

Distinguish confirmed facts from hypotheses. Severity is one of: low, medium, high, critical.

Respond with a single JSON object, no commentary:
{
  "summary": "what happened, in two or three sentences",
  "severity": "low|medium|high|critical",
  "timeline": [{"time": "timestamp or relative order", "event": ""}],
  "affected_assets": [],
  "hypotheses": [{"hypothesis": "", "confidence": "low|medium|high"}],
  "containment_actions": [],
  "open_questions": []
}"#;
