//! MITRE ATT&CK technique mapping.

use pipeline::INPUT_TEXT;

use super::ioc::IOCS;
use super::AgentSpec;

/// State key holding the mapped techniques.
pub const MITRE: &str = "mitre";

/// ATT&CK technique mapping node.
pub static SPEC: AgentSpec = AgentSpec {
    name: "mitre",
    system_prompt: SYSTEM_PROMPT,
    context: &[
        (INPUT_TEXT, "Incident description"),
        (IOCS, "Extracted indicators"),
    ],
    requires: &[INPUT_TEXT, IOCS],
    produces: &[MITRE],
    task: "Map the observed behaviour to MITRE ATT&CK techniques. \
           Respond with the JSON object only.",
};

const SYSTEM_PROMPT: &str = r#"You are a threat intelligence analyst who maps incident activity to the MITRE ATT&CK Enterprise matrix.

Use only technique and sub-technique IDs that exist in ATT&CK (e.g. T1110, T1059.001). Prefer fewer, well-supported mappings over speculative ones, and state the evidence for each.

Respond with a single JSON object, no commentary:
{
  "techniques": [
    {
      "id": "T1110",
      "name": "Brute Force",
      "tactic": "Credential Access",
      "evidence": "why this technique applies",
      "confidence": "low|medium|high"
    }
  ],
  "kill_chain_phase": "the furthest phase the attacker reached"
}"#;
