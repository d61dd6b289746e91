//! User-facing explanations of pipeline failures.

use pipeline::{FailureKind, NodeError, PipelineError, ProviderFailure};

/// Explains a classified provider failure with suggested next steps.
pub fn describe_failure(failure: &ProviderFailure) -> String {
    let (headline, advice): (&str, &[&str]) = match failure.kind {
        FailureKind::RateLimit => (
            "The provider's rate limit or quota was reached.",
            &[
                "wait for the limit window to reset and run again",
                "shorten the incident description",
                "use a different API key",
                "switch to a lighter model",
            ],
        ),
        FailureKind::ApiError => (
            "The provider's API returned an error.",
            &[
                "check the provider's status page",
                "try again in a few minutes",
            ],
        ),
        FailureKind::GenericError | FailureKind::UnknownError => (
            "The call to the provider failed.",
            &[
                "check that the API key is valid",
                "check that the model name exists for this provider",
                "check network connectivity",
            ],
        ),
        FailureKind::UnknownProvider => (
            "A node was routed to a provider this build cannot reach.",
            &["this is a configuration bug; report it together with the details below"],
        ),
    };

    let mut text = format!(
        "{headline}\n  provider: {}\n  model: {}\n  details: {}\n",
        failure.provider, failure.model, failure.detail
    );
    text.push_str(if failure.kind.is_user_actionable() {
        "Suggested actions:\n"
    } else {
        "Running again will not help:\n"
    });
    for line in advice {
        text.push_str(&format!("  - {line}\n"));
    }
    text
}

/// Explains any pipeline failure, naming the node that failed.
pub fn describe_pipeline_error(error: &PipelineError) -> String {
    match error {
        PipelineError::Node { node, source, .. } => match source {
            NodeError::Provider(failure) => {
                format!("Step '{node}' failed.\n{}", describe_failure(failure))
            }
            NodeError::Decode { message, excerpt } => format!(
                "Step '{node}' failed: the model's answer was not valid JSON ({message}).\n  \
                 response began: {excerpt}\nRunning again usually helps.\n"
            ),
            other => format!("Step '{node}' failed: {other}\n"),
        },
        PipelineError::MissingInput => "No incident description was provided.\n".to_string(),
        PipelineError::Configuration { message } => {
            format!("The pipeline is misconfigured: {message}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{NodeName, PipelineStage};

    fn failure(kind: FailureKind) -> ProviderFailure {
        ProviderFailure::new(kind, "groq", "llama-3.3-70b-versatile", "HTTP 429: slow down")
    }

    #[test]
    fn each_kind_gets_its_own_advice() {
        assert!(describe_failure(&failure(FailureKind::RateLimit)).contains("rate limit"));
        assert!(describe_failure(&failure(FailureKind::ApiError)).contains("status page"));
        assert!(describe_failure(&failure(FailureKind::GenericError)).contains("API key"));
        assert!(describe_failure(&failure(FailureKind::UnknownError)).contains("connectivity"));
        assert!(describe_failure(&failure(FailureKind::UnknownProvider)).contains("configuration bug"));
    }

    #[test]
    fn details_are_included() {
        let text = describe_failure(&failure(FailureKind::RateLimit));
        assert!(text.contains("provider: groq"));
        assert!(text.contains("model: llama-3.3-70b-versatile"));
        assert!(text.contains("details: HTTP 429: slow down"));
    }

    #[test]
    fn node_errors_name_the_step() {
        let error = PipelineError::Node {
            node: NodeName::new("cve").unwrap(),
            stage: PipelineStage::MitreDone,
            source: NodeError::Provider(failure(FailureKind::ApiError)),
        };
        let text = describe_pipeline_error(&error);
        assert!(text.starts_with("Step 'cve' failed."));
        assert!(text.contains("status page"));

        let decode = PipelineError::Node {
            node: NodeName::new("ioc").unwrap(),
            stage: PipelineStage::Start,
            source: NodeError::Decode {
                message: "expected value".into(),
                excerpt: "Sorry".into(),
            },
        };
        assert!(describe_pipeline_error(&decode).contains("not valid JSON"));
    }
}
