//! HTTP client for the summarisation backend.
//!
//! Uses reqwest for the single `POST /summarize` call.

use crate::config::EndpointConfig;
use crate::summary::{ErrorResponse, SummaryRequest, SummaryResponse};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("websum/", env!("CARGO_PKG_VERSION"));

/// Shown when a failure carries no message of its own
pub const GENERIC_ERROR: &str = "An unexpected error occurred.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summariser returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("failed to decode summary response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Text to show the user: the backend's own error message when it sent
    /// one, otherwise a generic fallback
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

/// Client bound to one summariser endpoint.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: Client,
    url: String,
}

impl SummaryClient {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(endpoint.timeout())
            .build()?;

        Ok(Self {
            http,
            url: endpoint.summarize_url(),
        })
    }

    /// URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post the request and return the markdown summary
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<String, ClientError> {
        debug!(
            url = %self.url,
            has_url = request.url.is_some(),
            text_len = request.text.as_ref().map_or(0, String::len),
            length = request.length,
            style = %request.summary_style,
            "posting summary request"
        );

        let response = self.http.post(&self.url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .map(|e| e.error)
                .filter(|message| !message.is_empty());
            warn!(%status, has_message = message.is_some(), "summariser rejected request");
            return Err(ClientError::Status { status, message });
        }

        let parsed: SummaryResponse =
            serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        debug!(summary_len = parsed.summary.len(), "received summary");
        Ok(parsed.summary)
    }
}
