//! Linear stage machine for one pipeline run.

use serde::{Deserialize, Serialize};

/// Progress marker for a pipeline run.
///
/// The machine is a single chain with no branches, cycles, or recovery edges:
/// `start → indicators_done → mitre_done → cve_done → investigation_done →
/// report_done`. A failed node leaves the run at the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// No node has run yet.
    Start,
    /// Indicators of compromise extracted (`iocs`).
    IndicatorsDone,
    /// ATT&CK techniques mapped (`mitre`).
    MitreDone,
    /// Related vulnerabilities listed (`cves`).
    CveDone,
    /// Investigation findings written (`investigation`).
    InvestigationDone,
    /// Final report produced (`report`, `report_text`). Terminal.
    ReportDone,
}

impl PipelineStage {
    /// Number of node transitions between [`Start`](Self::Start) and
    /// [`ReportDone`](Self::ReportDone).
    pub const TRANSITIONS: usize = 5;

    /// Returns the stage reached after one more node completes, or `None`
    /// from the terminal stage.
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::Start => Some(PipelineStage::IndicatorsDone),
            PipelineStage::IndicatorsDone => Some(PipelineStage::MitreDone),
            PipelineStage::MitreDone => Some(PipelineStage::CveDone),
            PipelineStage::CveDone => Some(PipelineStage::InvestigationDone),
            PipelineStage::InvestigationDone => Some(PipelineStage::ReportDone),
            PipelineStage::ReportDone => None,
        }
    }

    /// Returns `true` for [`ReportDone`](Self::ReportDone).
    pub fn is_terminal(self) -> bool {
        self == PipelineStage::ReportDone
    }

    /// Returns the snake_case name used in logs and serialised state.
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::IndicatorsDone => "indicators_done",
            PipelineStage::MitreDone => "mitre_done",
            PipelineStage::CveDone => "cve_done",
            PipelineStage::InvestigationDone => "investigation_done",
            PipelineStage::ReportDone => "report_done",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
