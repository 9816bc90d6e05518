//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::FetchError;

use super::charset::decode_page;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a page and return it decoded as UTF-8.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Larder/0.1; self-hosted recipe manager)";

/// Configuration for [`WebClient`].
#[derive(Clone)]
pub struct WebClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for WebClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WebClientBuilder {
    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<WebClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(WebClient { inner })
    }
}

/// Production client backed by reqwest.
#[derive(Clone)]
pub struct WebClient {
    inner: reqwest::Client,
}

impl WebClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        WebClientBuilder::default().build()
    }

    pub fn builder() -> WebClientBuilder {
        WebClientBuilder::default()
    }
}

#[async_trait]
impl HttpClient for WebClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url, "network: fetching page");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "network: fetched successfully");

        Ok(decode_page(&bytes, content_type.as_deref()))
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Html(String),
    Error(String),
}

/// Mock HTTP client for testing. Records every URL it is asked for.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an HTML response for a URL.
    pub fn with_html(mut self, url: &str, html: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Html(html.to_string()));
        self
    }

    /// Add an error response for a URL.
    pub fn with_error(mut self, url: &str, error: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Error(error.to_string()));
        self
    }

    /// URLs fetched so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Error(e)) => Err(FetchError::Mock(e.clone())),
            None => Err(FetchError::Mock(format!("No mock response for URL: {}", url))),
        }
    }
}
