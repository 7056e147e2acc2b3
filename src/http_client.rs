//! HTTP client abstraction for the completion service.
//!
//! This module provides a trait-based abstraction over HTTP clients,
//! enabling dependency injection and easy mocking in tests. The response
//! carries both status and body so service-side rejections can be surfaced
//! as structured errors.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Status and body of an HTTP response.
///
/// A non-success status is not an error at this layer; the caller decides
/// how to classify it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP communication with the completion service.
///
/// This abstraction allows injecting mock HTTP clients for testing without
/// making real network requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with JSON body and returns status and body.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures (connection refused,
    /// DNS, unreadable body); service-level rejections come back as an
    /// `HttpResponse` with a non-success status.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse>;
}

/// HTTP client implementation using reqwest.
///
/// This is the default production implementation that makes real HTTP
/// requests. No timeout is configured; the call waits as long as the
/// transport does.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default configuration.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
