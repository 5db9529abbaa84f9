//! Server error types.
//!
//! Every failure of a `/events` request ends up as a [`ServerError`], which
//! renders itself as a JSON `{"detail": ...}` body with the matching status.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use eventfeed_core::CoreError;
use eventfeed_providers::{ProviderError, ProviderErrorCode};

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The requested time zone is not a known IANA zone.
    #[error("Invalid tz: {name}")]
    InvalidTimeZone { name: String },

    /// The requested group is not configured.
    #[error("Unknown group '{group}'. Known: {known:?}")]
    UnknownGroup { group: String, known: Vec<String> },

    /// Neither a group nor a URL was given and no default applies.
    #[error("Provide ?group=... or ?url=...")]
    MissingSource,

    /// The page could not be retrieved.
    #[error("Fetch failed: {0}")]
    Fetch(#[source] ProviderError),

    /// The page exceeded the size cap.
    #[error("{}", .0.message())]
    TooLarge(#[source] ProviderError),

    /// The page could not be parsed.
    #[error("Parse failed: {0}")]
    Parse(#[source] ProviderError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error (listener bind, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an unknown group error; `known` is reported sorted.
    pub fn unknown_group<I, S>(group: impl Into<String>, known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = known.into_iter().map(Into::into).collect();
        known.sort();
        Self::UnknownGroup {
            group: group.into(),
            known,
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTimeZone { .. } | Self::UnknownGroup { .. } | Self::MissingSource => {
                StatusCode::BAD_REQUEST
            }
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Parse(_) | Self::Config { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTimeZone { name } => Self::InvalidTimeZone { name },
        }
    }
}

impl From<ProviderError> for ServerError {
    fn from(err: ProviderError) -> Self {
        match err.code() {
            ProviderErrorCode::TooLarge => Self::TooLarge(err),
            code if code.is_fetch_failure() => Self::Fetch(err),
            _ => Self::Parse(err),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
