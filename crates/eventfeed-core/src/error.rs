//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core building blocks.
///
/// Per-event problems (blank title, unparsable start time) are not errors:
/// those events are dropped by the normalizer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The time zone identifier is not a known IANA zone.
    #[error("Invalid tz: {name}")]
    InvalidTimeZone { name: String },
}

impl CoreError {
    /// Creates an invalid time zone error.
    pub fn invalid_time_zone(name: impl Into<String>) -> Self {
        Self::InvalidTimeZone { name: name.into() }
    }
}
