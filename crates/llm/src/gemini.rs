//! Gemini adapter (`models/{model}:generateContent`).
//!
//! Gemini is driven here without a system role: system and user content are
//! folded into one user turn. Assistant turns are dropped since every agent
//! call is a fresh single-turn request. Non-2xx responses are classified by
//! HTTP status and `error.status`; transport and body failures, which are only
//! available as text, go through the keyword heuristic.

use pipeline::{ChatMessage, LlmRequest, ProviderFailure, ProviderKind, Role};
use serde::{Deserialize, Serialize};

use crate::classify::{classify_message, classify_status};
use crate::{LlmSetupError, ProviderConfig};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Folds a role-tagged conversation into one payload for a backend without a
/// system role.
///
/// System content comes first, then a blank line, then user content. Several
/// messages of the same role are joined with blank lines. Assistant messages
/// are ignored.
pub fn combine_single_turn(messages: &[ChatMessage]) -> String {
    let collect = |role: Role| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    let system = collect(Role::System);
    let user = collect(Role::User);

    if system.is_empty() {
        user
    } else {
        format!("{system}\n\n{user}")
    }
}

/// HTTP client for Gemini's `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl GeminiClient {
    /// Builds the client and its HTTP connection pool.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmSetupError> {
        Ok(Self {
            http: crate::http_client(ProviderKind::Gemini, config.timeout)?,
            config,
        })
    }

    /// Connection settings this client was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Sends one `generateContent` request and returns the concatenated text
    /// parts of every candidate.
    pub async fn complete(&self, request: &LlmRequest) -> Result<String, ProviderFailure> {
        let model = self.config.resolve_model(request.model());
        let fail = |message: String| classify_message(ProviderKind::Gemini, &model, &message);

        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        let prompt = combine_single_turn(request.messages());
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature(),
                max_output_tokens: request.max_tokens().as_u32(),
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| fail(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(ProviderKind::Gemini, &model, status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| fail(e.without_url().to_string()))?;

        let text = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts.unwrap_or_default())
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(fail("response contained no text candidates".to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_then_blank_line_then_user() {
        let messages = [ChatMessage::system("You are a SOC analyst."), ChatMessage::user("Analyse this.")];
        assert_eq!(
            combine_single_turn(&messages),
            "You are a SOC analyst.\n\nAnalyse this."
        );
    }

    #[test]
    fn assistant_turns_are_dropped() {
        let messages = [
            ChatMessage::user("first"),
            ChatMessage::assistant("ignored"),
            ChatMessage::system("sys"),
        ];
        assert_eq!(combine_single_turn(&messages), "sys\n\nfirst");
    }

    #[test]
    fn user_only_payload_has_no_leading_separator() {
        assert_eq!(combine_single_turn(&[ChatMessage::user("only")]), "only");
    }

    #[test]
    fn fold_keeps_order_within_each_role() {
        let messages = [
            ChatMessage::system("Rules A"),
            ChatMessage::user("Incident: Zürich VPN 🚨"),
            ChatMessage::system("Rules B"),
            ChatMessage::user("Respond in JSON."),
        ];
        assert_eq!(
            combine_single_turn(&messages),
            "Rules A\n\nRules B\n\nIncident: Zürich VPN 🚨\n\nRespond in JSON."
        );
    }

    #[test]
    fn fold_preserves_content_verbatim() {
        let system = "  leading and trailing spaces  \n";
        let user = "line one\n\nline three\n";
        let folded = combine_single_turn(&[ChatMessage::system(system), ChatMessage::user(user)]);
        assert_eq!(folded, format!("{system}\n\n{user}"));
        assert!(folded.starts_with(system));
        assert!(folded.ends_with(user));
    }

    #[test]
    fn system_only_payload_ends_with_the_separator() {
        assert_eq!(combine_single_turn(&[ChatMessage::system("sys")]), "sys\n\n");
    }
}
