//! SOC Triage CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Load configuration**: `.env`, then provider credentials from the
//!    environment ([`config`]), then command-line flags.
//! 2. **Wire observability**: `tracing-subscriber` with JSON or compact output
//!    on stderr and optional OTLP export ([`observability`]).
//! 3. **Construct infrastructure**: a [`llm::ProviderGateway`] injected into a
//!    [`nodes::PipelineExecutor`].
//! 4. **Run once**: read the incident from stdin ([`input`]), print one line
//!    per finished node, print the report and persist it ([`output`]).
//!
//! Failures are printed with [`messages`] and the process exits non-zero.

mod config;
mod input;
mod messages;
mod observability;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use futures::TryStreamExt;
use llm::ProviderGateway;
use nodes::{PipelineExecutor, PipelineSettings};
use pipeline::{AnalysisState, PipelineError, ProviderKind, Timestamp};

use crate::observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "soc-triage", version)]
#[command(about = "Analyse a security incident description with a chain of LLM agents")]
struct Args {
    /// Route every node to this provider instead of the per-node defaults.
    #[arg(long, value_parser = parse_provider)]
    provider: Option<ProviderKind>,

    /// Directory the report files are written to.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Format of diagnostic logs on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn parse_provider(raw: &str) -> Result<ProviderKind, String> {
    raw.parse::<ProviderKind>().map_err(|failure| failure.detail)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let _telemetry = match observability::init(args.log_format) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialise logging: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PipelineError>() {
                Some(pipeline_error) => {
                    eprint!("\n{}", messages::describe_pipeline_error(pipeline_error))
                }
                None => eprintln!("\nError: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let settings = match args.provider {
        Some(provider) => PipelineSettings::default().with_provider(provider),
        None => PipelineSettings::default(),
    };
    let gateway_config = config::gateway_config(&settings, |name| std::env::var(name).ok())?;
    let gateway = Arc::new(ProviderGateway::new(gateway_config)?);
    let executor = PipelineExecutor::standard(gateway, &settings)?;
    tracing::info!(providers = ?settings.providers_in_use(), "pipeline ready");

    println!(
        "Paste the incident description, then a line containing {} (or end input):",
        input::END_MARKER
    );
    let text = tokio::task::spawn_blocking(|| input::read_incident(std::io::stdin().lock()))
        .await
        .context("stdin reader panicked")?
        .context("reading incident text from stdin")?;
    if text.trim().is_empty() {
        return Err(PipelineError::MissingInput.into());
    }

    let initial = AnalysisState::new(text);
    let mut state = initial.clone();
    let progress = executor.run(initial);
    futures::pin_mut!(progress);
    while let Some(completion) = progress.try_next().await? {
        println!("Finished: {}", completion.node);
        state.merge(completion.update);
    }
    tracing::debug!(keys = ?state.keys().collect::<Vec<_>>(), "final analysis state");

    let (Some(report_text), Some(report)) = (state.report_text(), state.report()) else {
        bail!("pipeline finished without producing a report");
    };
    println!("\n{report_text}");

    let saved = output::save_report(&args.output_dir, Timestamp::now(), report_text, report)?;
    println!(
        "Report saved to {} and {}",
        saved.text_path.display(),
        saved.json_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["soc-triage"]).unwrap();
        assert_eq!(args.provider, None);
        assert_eq!(args.output_dir, PathBuf::from("output"));
        assert_eq!(args.log_format, LogFormat::Compact);
    }

    #[test]
    fn provider_flag_is_case_insensitive() {
        let args = Args::try_parse_from(["soc-triage", "--provider", "Gemini"]).unwrap();
        assert_eq!(args.provider, Some(ProviderKind::Gemini));
    }

    #[test]
    fn unsupported_provider_is_rejected() {
        assert!(Args::try_parse_from(["soc-triage", "--provider", "openai"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
