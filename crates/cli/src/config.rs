//! Provider credentials and tuning from the process environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `GROQ_API_KEY` / `GEMINI_API_KEY` | Credential; required for every provider a node uses |
//! | `GROQ_MODEL` / `GEMINI_MODEL` | Model used when a node names none |
//! | `GROQ_BASE_URL` / `GEMINI_BASE_URL` | Endpoint override |
//! | `LLM_REQUEST_TIMEOUT_SECS` | Per-request timeout; unset means no timeout |
//!
//! A `.env` file in the working directory is loaded into the environment
//! before these are read.

use std::time::Duration;

use anyhow::{bail, Context};
use llm::{GatewayConfig, ProviderConfig};
use nodes::PipelineSettings;
use pipeline::{ModelName, ProviderKind};

pub const TIMEOUT_VAR: &str = "LLM_REQUEST_TIMEOUT_SECS";

struct ProviderVars {
    api_key: &'static str,
    model: &'static str,
    base_url: &'static str,
}

fn vars(provider: ProviderKind) -> ProviderVars {
    match provider {
        ProviderKind::Groq => ProviderVars {
            api_key: "GROQ_API_KEY",
            model: "GROQ_MODEL",
            base_url: "GROQ_BASE_URL",
        },
        ProviderKind::Gemini => ProviderVars {
            api_key: "GEMINI_API_KEY",
            model: "GEMINI_MODEL",
            base_url: "GEMINI_BASE_URL",
        },
    }
}

/// Builds the gateway configuration from `lookup`.
///
/// Blank values count as unset. A provider without a key is left disabled
/// unless a node of `settings` routes to it, in which case this fails.
pub fn gateway_config(
    settings: &PipelineSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<GatewayConfig> {
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let timeout = match get(TIMEOUT_VAR) {
        Some(raw) => {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))?;
            if secs == 0 {
                bail!("{TIMEOUT_VAR} must be greater than zero");
            }
            Some(Duration::from_secs(secs))
        }
        None => None,
    };

    let mut config = GatewayConfig::default();
    for provider in ProviderKind::ALL {
        let names = vars(provider);
        let Some(api_key) = get(names.api_key) else {
            if settings.uses(provider) {
                bail!(
                    "{} is not set; it is required because the pipeline routes nodes to {provider}",
                    names.api_key
                );
            }
            tracing::debug!(%provider, "no API key; provider disabled");
            continue;
        };

        let mut provider_config = ProviderConfig::new(provider, api_key).with_timeout(timeout);
        if let Some(model) = get(names.model).and_then(ModelName::new) {
            provider_config = provider_config.with_default_model(model);
        }
        if let Some(base_url) = get(names.base_url) {
            provider_config = provider_config.with_base_url(base_url);
        }

        match provider {
            ProviderKind::Groq => config.groq = Some(provider_config),
            ProviderKind::Gemini => config.gemini = Some(provider_config),
        }
    }

    Ok(config)
}
