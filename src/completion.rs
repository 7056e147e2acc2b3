//! Completion service client.
//!
//! One outbound request per invocation, no internal retry, no timeout.
//! Success returns the first candidate's text verbatim; failure is a
//! uniform [`CompletionError`] wrapping either a structured service error
//! (status + body) or a raw transport error message.

use crate::config::Credentials;
use crate::http_client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Model identifier sent with every request.
pub const MODEL: &str = "text-davinci-003";

/// Maximum context size, in characters used as a token proxy.
///
/// The remaining token budget is `MAX_CONTEXT - prompt.len()`; the raw
/// length subtraction is intentional and may go to zero or negative, in
/// which case the request is still sent and the service's rejection is
/// surfaced as an ordinary failure.
pub const MAX_CONTEXT: i64 = 4000;

/// Fixed sampling temperature.
pub const TEMPERATURE: f64 = 0.7;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";

/// Successful response envelope; fields beyond the candidates are ignored.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Uniform failure descriptor for a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The service answered with a non-success status; both the status and
    /// the response body are kept for diagnostics.
    Service { status: u16, body: String },
    /// The request never produced a usable response (connection failure,
    /// unreadable or malformed body).
    Transport(String),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service { status, body } => {
                write!(f, "completion service returned status {status}: {body}")
            }
            Self::Transport(message) => write!(f, "completion request failed: {message}"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Trait for fetching one completion for a prompt.
///
/// The orchestrator suspends on this call; implementations must not retry
/// or fall back on failure.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Completion client for the OpenAI completions endpoint.
pub struct OpenAiClient {
    http: Arc<dyn HttpClient>,
    credentials: Credentials,
}

impl OpenAiClient {
    /// Creates a client with the given transport and credentials.
    ///
    /// Credentials are injected once at construction and never re-read.
    pub fn new(http: Arc<dyn HttpClient>, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "model": MODEL,
            "prompt": prompt,
            "max_tokens": MAX_CONTEXT - prompt.len() as i64,
            "temperature": TEMPERATURE,
        })
    }

    fn first_candidate(body: &str) -> Option<String> {
        let response: CompletionResponse = serde_json::from_str(body).ok()?;
        response.choices.into_iter().next().map(|choice| choice.text)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        info!("Requesting completion ({} prompt chars)", prompt.len());

        let authorization = format!("Bearer {}", self.credentials.api_key());
        let headers = [
            ("Authorization", authorization.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .http
            .post_json(COMPLETIONS_URL, &headers, &Self::request_body(prompt))
            .await
            .map_err(|e| {
                warn!("Completion transport failure: {}", e);
                CompletionError::Transport(e.to_string())
            })?;

        if !response.is_success() {
            warn!(
                "Completion service error: status {} body {}",
                response.status, response.body
            );
            return Err(CompletionError::Service {
                status: response.status,
                body: response.body,
            });
        }

        // First candidate, verbatim: no trimming, no post-processing.
        Self::first_candidate(&response.body).ok_or_else(|| {
            warn!("Malformed completion response: {}", response.body);
            CompletionError::Transport(format!(
                "malformed completion response: {}",
                response.body
            ))
        })
    }
}
