//! Comment summarization through the Anthropic Messages API.
//!
//! Implements the SummaryClient trait. Every failure is reported as a
//! [`GenerationResult`] so the caller can fall back to a fixed message.

use std::time::Duration;

use async_trait::async_trait;
use domain::services::{GenerationResult, SummaryClient};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SummaryConfig;

/// Messages API request body.
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Error type for summarization calls.
#[derive(Debug, thiserror::Error)]
pub enum AnthropicError {
    #[error("Summary API key is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Summary API returned {status}: {body}")]
    ApiError { status: StatusCode, body: String },
}

/// Summary client backed by the Anthropic Messages API.
pub struct AnthropicSummaryClient {
    client: Client,
    config: SummaryConfig,
}

impl AnthropicSummaryClient {
    /// Create a client; fails if no API key is configured.
    pub fn new(config: SummaryConfig) -> Result<Self, AnthropicError> {
        if !config.is_configured() {
            return Err(AnthropicError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Sends the prompt; `Ok(None)` means the reply carried no text.
    async fn request(&self, prompt: &str) -> Result<Option<String>, AnthropicError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", self.config.api_key.trim())
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnthropicError::ApiError { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(extract_text(&bytes))
    }
}

/// Messages API response body; only the text blocks are read.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Reads `content[0].text` from a Messages API response body.
fn extract_text(body: &[u8]) -> Option<String> {
    let response: MessagesResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Summary response could not be parsed");
            return None;
        }
    };

    response
        .content
        .into_iter()
        .next()?
        .text
        .filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl SummaryClient for AnthropicSummaryClient {
    async fn generate(&self, prompt: &str) -> GenerationResult {
        match self.request(prompt).await {
            Ok(Some(text)) => {
                debug!(chars = text.chars().count(), "Summary generated");
                GenerationResult::Generated(text)
            }
            Ok(None) => GenerationResult::MissingText,
            Err(e) => GenerationResult::Failed(e.to_string()),
        }
    }
}
