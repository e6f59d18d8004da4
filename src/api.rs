//! Generative model interaction.
//!
//! This module provides the seam between the news adapter and the upstream
//! model:
//! - [`AskAsync`]: Core trait defining "send a prompt, get text back"
//! - [`GeminiClient`]: Calls the Gemini `generateContent` REST endpoint with
//!   Google Search grounding enabled
//!
//! Calls are single-shot: a failed call is reported once and the caller
//! degrades to its fallback.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// System-level instruction sent alongside every prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a specialized space news backend. Always output valid JSON. Never output markdown.";

/// Trait for async LLM interaction.
///
/// Implementors send text to a model and hand back its reply. The news
/// adapter is generic over this trait so tests can script the model.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send `text` to the model and receive its reply.
    async fn ask(&self, text: &str) -> Result<Self::Response>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    ///
    /// Grounded replies may split the answer over several parts; non-text
    /// parts are skipped.
    fn into_text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::EmptyReply);
        }
        Ok(text)
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
}

impl GeminiClient {
    /// Build a client for the model named in `config`.
    ///
    /// A missing key is not an error here; calls made without one fail, and
    /// the adapter turns that into its fallback like any other failure.
    pub fn new(api_key: Option<String>, config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let endpoint = Url::parse(&format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        ))?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl AskAsync for GeminiClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn ask(&self, text: &str) -> Result<Self::Response> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;
        let t0 = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::new(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Upstream rejected request"
            );
            return Err(Error::Upstream { status, body });
        }

        let reply = response
            .json::<GenerateContentResponse>()
            .await?
            .into_text()?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = reply.len(),
            "Upstream replied"
        );
        debug!(reply = %crate::utils::truncate_for_log(&reply, 300), "Reply preview");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new("find news")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "find news"}]}],
                "systemInstruction": {"parts": [{"text": SYSTEM_INSTRUCTION}]},
                "tools": [{"google_search": {}}]
            })
        );
    }

    #[test]
    fn test_reply_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"arti"}, {"text": "cles\": []}"}]}
            }]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "{\"articles\": []}");
    }

    #[test]
    fn test_reply_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.into_text(), Err(Error::EmptyReply)));
    }

    #[test]
    fn test_reply_with_only_whitespace_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  \n"}]}}]
        }))
        .unwrap();
        assert!(matches!(response.into_text(), Err(Error::EmptyReply)));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = AppConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            ..AppConfig::default()
        };
        let client = GeminiClient::new(Some("k".to_string()), &config).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new(Some("secret-key".to_string()), &AppConfig::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_ask_without_key_fails_before_network() {
        let client = GeminiClient::new(Some(String::new()), &AppConfig::default()).unwrap();
        let result = client.ask("hello").await;
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }
}
