//! Bounded HTTP page fetching.
//!
//! [`PageFetcher`] is the seam the request handler calls through; the
//! production implementation is [`HttpFetcher`], built on reqwest. The body
//! is read chunk by chunk so that an oversized page is rejected as soon as
//! the running total crosses the cap, without buffering the rest.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_LENGTH};
use reqwest::{Client, Response};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Default response size cap, in bytes.
pub const DEFAULT_MAX_BYTES: u64 = 3_000_000;

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; eventfeed)";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// A boxed future, used to keep [`PageFetcher`] object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Retrieves the raw bytes of an event page.
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns its body.
    ///
    /// Implementations must fail with a `TooLarge` error rather than return
    /// a body longer than their cap.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>>;
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Maximum accepted body size.
    pub max_bytes: u64,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the size cap.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Builder method to set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches pages over HTTP(S) with a timeout and a size cap.
pub struct HttpFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Creates a fetcher with the given settings.
    pub fn new(settings: &FetchSettings) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(&settings.user_agent)
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> ProviderResult<Vec<u8>> {
        let parsed = parse_source_url(url)?;

        trace!(url = %parsed, "Sending request");
        let response = self
            .client
            .get(parsed)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| map_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Upstream returned error status");
            return Err(ProviderError::upstream_status(format!(
                "Upstream returned HTTP {}",
                status.as_u16()
            )));
        }

        if let Some(declared) = declared_length(&response).filter(|&d| d > self.max_bytes) {
            debug!(url = %url, declared, "Declared length over cap");
            return Err(ProviderError::too_large(self.max_bytes));
        }

        let body = self.read_capped(response).await?;
        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    async fn read_capped(&self, mut response: Response) -> ProviderResult<Vec<u8>> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_read_error)? {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > self.max_bytes {
                return Err(ProviderError::too_large(self.max_bytes));
            }
        }
        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        Box::pin(self.fetch_bytes(url))
    }
}

fn parse_source_url(url: &str) -> ProviderResult<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| ProviderError::invalid_url(format!("Invalid URL {:?}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProviderError::invalid_url(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}

fn declared_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn map_send_error(url: &str, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request to {} timed out", url)).with_source(e)
    } else {
        ProviderError::network(format!("Request to {} failed: {}", url, e)).with_source(e)
    }
}

fn map_read_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout("Timed out reading response body").with_source(e)
    } else {
        ProviderError::network(format!("Failed to read response body: {}", e)).with_source(e)
    }
}
