//! Report persistence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pipeline::Timestamp;
use serde_json::{Map, Value};

const FILE_PREFIX: &str = "incident_report";

/// Paths of one persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub text_path: PathBuf,
    pub json_path: PathBuf,
}

/// Writes `incident_report_<stamp>.txt` and `.json` into `dir`, creating it
/// if needed. Existing files with the same stamp are overwritten.
pub fn save_report(
    dir: &Path,
    at: Timestamp,
    report_text: &str,
    report: &Map<String, Value>,
) -> anyhow::Result<SavedReport> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let stem = format!("{FILE_PREFIX}_{}", at.file_stamp());
    let text_path = dir.join(format!("{stem}.txt"));
    let json_path = dir.join(format!("{stem}.json"));

    fs::write(&text_path, report_text)
        .with_context(|| format!("writing {}", text_path.display()))?;
    let json = serde_json::to_string_pretty(report).context("serialising report")?;
    fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;

    tracing::info!(text = %text_path.display(), json = %json_path.display(), "report saved");
    Ok(SavedReport {
        text_path,
        json_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_stamp() -> Timestamp {
        serde_json::from_value(json!("2024-03-05T14:07:09Z")).unwrap()
    }

    #[test]
    fn writes_both_files_with_timestamped_names() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let report = json!({"title": "Brute force", "severity": "high"});

        let saved = save_report(
            &out,
            fixed_stamp(),
            "=== INCIDENT REPORT ===\nTitle: Brute force\n",
            report.as_object().unwrap(),
        )
        .unwrap();

        assert_eq!(
            saved.text_path,
            out.join("incident_report_2024-03-05_14-07-09.txt")
        );
        assert_eq!(
            saved.json_path,
            out.join("incident_report_2024-03-05_14-07-09.json")
        );
        assert_eq!(
            fs::read_to_string(&saved.text_path).unwrap(),
            "=== INCIDENT REPORT ===\nTitle: Brute force\n"
        );
        let written: Value =
            serde_json::from_str(&fs::read_to_string(&saved.json_path).unwrap()).unwrap();
        assert_eq!(written, report);
    }
}
