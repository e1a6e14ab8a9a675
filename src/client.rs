//! HTTP client for the feedback endpoint.
//!
//! Configuration is via environment variables:
//! - `FEEDBACK_DESK_URL` - Base URL (default: `http://localhost:5000`)
//! - `FEEDBACK_DESK_TIMEOUT_SECS` - Request timeout in seconds (default: `30`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{FeedbackRequest, FeedbackResponse};

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from talking to the feedback endpoint.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// True when a response arrived but could not be used.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Anything that can deliver a feedback submission and return the acknowledgement.
#[async_trait]
pub trait FeedbackBackend: Send + Sync {
    async fn send(&self, request: &FeedbackRequest) -> Result<FeedbackResponse, BackendError>;
}

/// HTTP client for the feedback endpoint.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl FeedbackClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FEEDBACK_DESK_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let timeout = std::env::var("FEEDBACK_DESK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self::new(base_url, timeout)
    }

    /// Create with explicit configuration.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url).timeout(self.timeout)
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Http(e)
        }
    }

    /// Post a submission. The body is parsed strictly: anything without a
    /// string `aiResponse` is [`BackendError::Malformed`].
    pub async fn submit_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<FeedbackResponse, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "/api/feedback")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(BackendError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|e| BackendError::Malformed(e.to_string()))
    }

    /// Check whether the server answers its health endpoint.
    pub async fn health(&self) -> Result<bool, BackendError> {
        let response = self
            .request(reqwest::Method::GET, "/api/health")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl FeedbackBackend for FeedbackClient {
    async fn send(&self, request: &FeedbackRequest) -> Result<FeedbackResponse, BackendError> {
        self.submit_feedback(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = FeedbackClient::new("http://localhost:5000/", DEFAULT_TIMEOUT);
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn only_malformed_reports_malformed() {
        assert!(BackendError::Malformed("x".into()).is_malformed());
        assert!(!BackendError::Timeout(DEFAULT_TIMEOUT).is_malformed());
        assert!(!BackendError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        }
        .is_malformed());
    }
}
