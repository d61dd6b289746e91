//! Vulnerability lookup.

use pipeline::INPUT_TEXT;

use super::ioc::IOCS;
use super::mitre::MITRE;
use super::AgentSpec;

/// State key holding the relevant vulnerabilities.
pub const CVES: &str = "cves";

/// Vulnerability lookup node.
pub static SPEC: AgentSpec = AgentSpec {
    name: "cve",
    system_prompt: SYSTEM_PROMPT,
    context: &[
        (INPUT_TEXT, "Incident description"),
        (IOCS, "Extracted indicators"),
        (MITRE, "Mapped ATT&CK techniques"),
    ],
    requires: &[INPUT_TEXT, IOCS, MITRE],
    produces: &[CVES],
    task: "List the publicly known vulnerabilities that could explain or enable this incident. \
           Respond with the JSON object only.",
};

const SYSTEM_PROMPT: &str = r#"You are a vulnerability analyst. Given an incident, its indicators and the ATT&CK techniques observed, identify CVEs that plausibly relate to the affected software, services or attack path.

Only cite CVE identifiers you are confident exist. If the incident names no product or version, return an empty list and explain why in "notes".

Respond with a single JSON object, no commentary:
{
  "cves": [
    {
      "id": "CVE-YYYY-NNNNN",
      "product": "affected product",
      "description": "short description",
      "cvss": 0.0,
      "relevance": "how it relates to this incident"
    }
  ],
  "notes": ""
}"#;
