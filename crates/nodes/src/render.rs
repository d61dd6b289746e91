//! Plain-text rendering of the structured report.

use serde_json::{Map, Value};

const HEADER: &str = "=== INCIDENT REPORT ===";

/// Fields rendered as headed sections, in this order, before any others.
const SECTIONS: &[(&str, &str)] = &[
    ("summary", "Summary"),
    ("indicators", "Indicators of Compromise"),
    ("mitre_techniques", "MITRE ATT&CK Techniques"),
    ("cves", "Related Vulnerabilities"),
    ("timeline", "Timeline"),
    ("impact", "Impact"),
    ("recommendations", "Recommendations"),
    ("conclusion", "Conclusion"),
];

/// Fields rendered on the header lines.
const HEADLINES: &[(&str, &str)] = &[("title", "Title"), ("severity", "Severity")];

/// Renders a structured report as plain text.
///
/// Known fields get fixed headings and order; unknown fields follow under a
/// heading derived from their key. The output always starts with a header
/// line, so it is never empty.
pub fn render_report(report: &Map<String, Value>) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for (key, label) in HEADLINES {
        if let Some(value) = report.get(*key) {
            out.push_str(&format!("{label}: {}\n", inline(value)));
        }
    }

    for (key, label) in SECTIONS {
        if let Some(value) = report.get(*key) {
            push_section(&mut out, label, value);
        }
    }

    let known = |k: &str| HEADLINES.iter().chain(SECTIONS).any(|(key, _)| *key == k);
    for (key, value) in report.iter().filter(|(k, _)| !known(k.as_str())) {
        push_section(&mut out, &heading(key), value);
    }

    out
}

fn push_section(out: &mut String, label: &str, value: &Value) {
    out.push('\n');
    out.push_str(label);
    out.push('\n');
    out.push_str(&"-".repeat(label.chars().count()));
    out.push('\n');
    out.push_str(&block(value));
    out.push('\n');
}

/// Multi-line rendering: one bullet per array item, one line per object field.
fn block(value: &Value) -> String {
    match value {
        Value::Array(items) if items.is_empty() => "(none)".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| format!("- {}", inline(item)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) if map.is_empty() => "(none)".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", heading(k), inline(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => inline(other),
    }
}

/// Single-line rendering.
fn inline(value: &Value) -> String {
    match value {
        Value::Null => "n/a".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(inline).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{k}: {}", inline(v)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// `affected_assets` → `Affected assets`.
fn heading(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: Value) -> String {
        render_report(value.as_object().unwrap())
    }

    #[test]
    fn known_fields_render_in_fixed_order() {
        let text = render(json!({
            "recommendations": ["Reset the account password"],
            "title": "Brute force against VPN",
            "severity": "high",
            "summary": "Repeated failed logins from 10.0.0.5.",
            "mitre_techniques": [{"id": "T1110", "name": "Brute Force"}]
        }));

        assert!(text.starts_with("=== INCIDENT REPORT ===\nTitle: Brute force against VPN\nSeverity: high\n"));
        let summary = text.find("Summary\n-------").unwrap();
        let techniques = text.find("MITRE ATT&CK Techniques").unwrap();
        let recommendations = text.find("Recommendations").unwrap();
        assert!(summary < techniques && techniques < recommendations);
        assert!(text.contains("- id: T1110; name: Brute Force"));
        assert!(text.contains("- Reset the account password"));
    }

    #[test]
    fn unknown_fields_get_derived_headings() {
        let text = render(json!({"affected_assets": ["vpn-gw-01"], "lessons_learned": null}));
        assert!(text.contains("Affected assets\n---------------\n- vpn-gw-01"));
        assert!(text.contains("Lessons learned\n---------------\nn/a"));
    }

    #[test]
    fn empty_report_still_has_a_header() {
        assert_eq!(render(json!({})), "=== INCIDENT REPORT ===\n");
        assert!(render(json!({"cves": []})).contains("(none)"));
    }
}
