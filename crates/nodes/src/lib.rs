//! SOC Triage agent node implementations and pipeline executor.
//!
//! This crate provides the five default agent nodes (indicator extraction,
//! ATT&CK technique mapping, vulnerability lookup, investigation synthesis,
//! report generation) and the [`PipelineExecutor`] that runs them in order and
//! streams progress to its caller.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Nodes sequence calls between the domain types in
//! the [`pipeline`] crate and the [`pipeline::LlmGateway`] port. They know
//! nothing about HTTP or any specific provider API.

pub mod agents;
pub mod executor;
pub mod render;
pub mod settings;

pub use agents::{AgentSpec, AnalysisAgent, ReportAgent};
pub use executor::{NodeCompletion, PipelineExecutor};
pub use render::render_report;
pub use settings::{NodeSettings, PipelineSettings};
