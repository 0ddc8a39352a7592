// ABOUTME: HTTP existence check for asset URLs through the HeaderFetcher capability.
// ABOUTME: The reqwest implementation issues HEAD, follows redirects, and lowercases header names.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// Status, final URL, and headers of an existence request.
#[derive(Debug, Clone, Default)]
pub struct HeadResponse {
    pub status: u16,
    /// URL after redirects; the media probe runs against this.
    pub final_url: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
}

impl HeadResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok())
    }
}

/// Generic network failure from the fetch collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(String),
}

/// Capability for the existence/metadata request.
#[async_trait]
pub trait HeaderFetcher: Send + Sync {
    async fn fetch_headers(&self, url: &str) -> Result<HeadResponse, TransportError>;
}

/// `HeaderFetcher` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with the given timeout and user agent.
    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HeaderFetcher for ReqwestFetcher {
    async fn fetch_headers(&self, url: &str) -> Result<HeadResponse, TransportError> {
        let response = self.client.head(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        Ok(HeadResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
            headers,
        })
    }
}
