//! Error types for fetching and parsing event pages.
//!
//! Both collaborators of the pipeline (the page fetcher and the listing
//! parser) report failures through [`ProviderError`]. Callers classify them
//! with [`ProviderErrorCode`] to pick a response status.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The source URL is malformed or uses an unsupported scheme.
    InvalidUrl,
    /// Connection failed, DNS resolution failed, body read failed, etc.
    NetworkError,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The source answered with a non-success HTTP status.
    UpstreamStatus,
    /// The page exceeded the configured size cap.
    TooLarge,
    /// The page content could not be recognized as an event listing.
    ParseError,
    /// Internal provider error - unexpected state, bug.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if this error came from reaching the source page, as
    /// opposed to interpreting its content.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl | Self::NetworkError | Self::Timeout | Self::UpstreamStatus
        )
    }

    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::UpstreamStatus => "upstream_status",
            Self::TooLarge => "too_large",
            Self::ParseError => "parse_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching or parsing an event page.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidUrl, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Timeout, message)
    }

    /// Creates an upstream status error.
    pub fn upstream_status(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::UpstreamStatus, message)
    }

    /// Creates a size cap error.
    pub fn too_large(max_bytes: u64) -> Self {
        Self::new(
            ProviderErrorCode::TooLarge,
            format!("HTML exceeded {} bytes cap", max_bytes),
        )
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ParseError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
