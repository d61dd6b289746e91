//! Recovery of a JSON payload from free-text model output.
//!
//! Models wrap JSON inconsistently: sometimes bare, sometimes inside a
//! markdown fence, sometimes between sentences of commentary. The decoder
//! tries three strategies in order and always returns *something*; parsing
//! the result, and handling a parse failure, is the caller's business.

use std::sync::LazyLock;

use regex::Regex;

/// First fenced block labelled `json` (any case), across lines, lazily.
static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json(.*?)```").expect("static fence pattern is valid"));

/// Extracts the most likely JSON payload from `text`. Never fails.
///
/// 1. The interior of the first ```` ```json ```` fenced block, trimmed.
/// 2. Otherwise the span from the first `{` to the last `}` inclusive, when
///    the closing brace follows the opening one, trimmed.
/// 3. Otherwise the whole input, trimmed.
///
/// Strategy 2 can mis-extract when unrelated braces surround the payload.
pub fn extract_json_block(text: &str) -> String {
    if let Some(body) = JSON_FENCE.captures(text).and_then(|c| c.get(1)) {
        tracing::trace!("json payload found in fenced block");
        return body.as_str().trim().to_string();
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            tracing::trace!(start, end, "json payload taken from outer braces");
            return text[start..=end].trim().to_string();
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn fenced_block_round_trips_an_object() {
        let object = json!({"iocs": {"ips": ["10.0.0.5"]}, "count": 1, "ok": true});
        let text = format!("```json\n{}\n```", serde_json::to_string(&object).unwrap());

        let parsed: Value = serde_json::from_str(&extract_json_block(&text)).unwrap();
        assert_eq!(parsed, object);
    }

    #[test]
    fn fence_label_is_case_insensitive_and_first_block_wins() {
        let text = "Here:\n```JSON\n{\"a\": 1}\n```\nand\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn braces_span_from_first_open_to_last_close() {
        assert_eq!(extract_json_block(r#"noise {"a":1} trailing"#), r#"{"a":1}"#);
        assert_eq!(
            extract_json_block(r#"x {"a":{"b":2}} y } z"#),
            r#"{"a":{"b":2}} y }"#
        );
    }

    #[test]
    fn text_without_json_is_returned_trimmed() {
        assert_eq!(extract_json_block("  no payload here \n"), "no payload here");
        assert_eq!(extract_json_block("} backwards {"), "} backwards {");
        assert_eq!(extract_json_block(""), "");
    }

    #[test]
    fn unlabelled_fence_falls_back_to_braces() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    fn payloads() -> Vec<Value> {
        vec![
            json!({}),
            json!({"mitre": {"techniques": [{"id": "T1110.003", "tactic": {"name": "Credential Access"}}]}}),
            json!({"summary": "Connexion suspecte depuis Zürich → 東京 🚨", "hosts": ["wks-ü01"]}),
            json!({"command": "powershell -c \"if ($x) { exit }\"", "depth": {"a": {"b": {"c": null}}}}),
            json!({"count": -3, "ratio": 0.25, "flags": [true, false]}),
        ]
    }

    #[test]
    fn every_wrapping_recovers_the_payload() {
        for payload in payloads() {
            let compact = serde_json::to_string(&payload).unwrap();
            let pretty = serde_json::to_string_pretty(&payload).unwrap();
            let wrappings = [
                compact.clone(),
                format!("   \n{pretty}\n\t "),
                format!("```json\n{pretty}\n```"),
                format!("Result:\n  ```JSON  \r\n{compact}\r\n  ```  \nDone."),
                format!("```Json{compact}```"),
                format!("Sure! Here is the analysis: {compact} Let me know if you need more."),
            ];
            for text in &wrappings {
                let parsed: Value = serde_json::from_str(&extract_json_block(text))
                    .unwrap_or_else(|e| panic!("{e} for {text:?}"));
                assert_eq!(parsed, payload, "wrapping {text:?}");
            }
        }
    }

    #[test]
    fn fenced_arrays_are_recovered() {
        let text = "```json\n[{\"id\": \"CVE-2024-3400\"}, {\"id\": \"CVE-2023-4966\"}]\n```";
        let parsed: Value = serde_json::from_str(&extract_json_block(text)).unwrap();
        assert_eq!(parsed, json!([{"id": "CVE-2024-3400"}, {"id": "CVE-2023-4966"}]));
    }

    #[test]
    fn fenced_interior_is_trimmed_exactly() {
        assert_eq!(extract_json_block("```json   \n\n  {\"a\": 1}  \n\n```"), "{\"a\": 1}");
    }
}
