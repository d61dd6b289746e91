//! Indicator-of-compromise extraction.

use pipeline::INPUT_TEXT;

use super::AgentSpec;

/// State key holding the extracted indicators.
pub const IOCS: &str = "iocs";

/// Indicator extraction node.
pub static SPEC: AgentSpec = AgentSpec {
    name: "ioc",
    system_prompt: SYSTEM_PROMPT,
    context: &[(INPUT_TEXT, "Incident description")],
    requires: &[INPUT_TEXT],
    produces: &[IOCS],
    task: "Extract every indicator of compromise from the incident above. \
           Respond with the JSON object only.",
};

const SYSTEM_PROMPT: &str = r#"You are a senior SOC analyst specialised in extracting indicators of compromise (IOCs) from incident reports, alerts and raw logs.

Only report indicators that literally appear in the input. Do not invent values. Normalise defanged values (hxxp, [.]) back to their real form.

Respond with a single JSON object, no commentary, using exactly these keys (empty lists when nothing is found):
{
  "ips": [],
  "domains": [],
  "urls": [],
  "hashes": [{"type": "md5|sha1|sha256", "value": ""}],
  "emails": [],
  "user_accounts": [],
  "hostnames": [],
  "file_paths": [],
  "processes": [],
  "other": []
}"#;
