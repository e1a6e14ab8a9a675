//! Gemini-backed acknowledgements.
//!
//! The API key is server-side configuration only; it is sent in the
//! `x-goog-api-key` header and never appears in URLs or client responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::{build_prompt, Acknowledger, DETAILED_FALLBACK, SHORT_FALLBACK};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 200;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generation service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `None` when `GEMINI_API_KEY` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("FEEDBACK_DESK_GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("FEEDBACK_DESK_GEMINI_URL") {
            config.base_url = url;
        }
        Some(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        let text = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GeminiAcknowledger {
    config: GeminiConfig,
    client: Client,
}

impl GeminiAcknowledger {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Ask the model for an acknowledgement. `Ok(None)` means a JSON answer
    /// arrived without usable text, including JSON error bodies on a
    /// non-success status. Only transport failures and non-JSON bodies are `Err`.
    pub async fn generate(
        &self,
        rating: u8,
        review: &str,
    ) -> Result<Option<String>, GenerationError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(rating, review) }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            }
        });

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<GenerateContentResponse>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    tracing::warn!(%status, "Generation service answered with an error");
                }
                Ok(parsed.first_text())
            }
            Err(e) if status.is_success() => Err(GenerationError::Decode(e)),
            Err(_) => Err(GenerationError::Status { status, body }),
        }
    }
}

#[async_trait]
impl Acknowledger for GeminiAcknowledger {
    async fn acknowledge(&self, rating: u8, review: &str) -> String {
        match self.generate(rating, review).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(model = %self.config.model, "Generation returned no candidate text");
                DETAILED_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::error!("AI generation error: {}", e);
                SHORT_FALLBACK.to_string()
            }
        }
    }
}
