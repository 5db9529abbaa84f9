//! RawEvent to NormalizedEvent conversion.
//!
//! A raw listing is kept only if it has a non-blank title and a start time
//! that can be understood. Anything else is dropped without raising an error:
//! scraped pages routinely contain partial entries.
//!
//! Start times are accepted as:
//! 1. a timestamp value already carrying an offset, converted into the zone
//! 2. a wall-clock timestamp, read as local time in the zone
//! 3. ISO-8601-like text, parsed into one of the above (a trailing `Z` means UTC)
//!
//! Wall-clock inputs keep their numbers for display, including times skipped
//! by a DST transition; only the UTC instant is adjusted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::debug;

use eventfeed_core::NormalizedEvent;

use crate::raw_event::{RawEvent, RawStart};

/// Formats tried for text carrying an explicit offset.
///
/// `%#z` takes `±HH`, `±HHMM` and `±HH:MM`.
const OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

/// Formats tried for wall-clock text.
const WALL_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Formats tried for bare dates, read as local midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Converts a [`RawEvent`] into a [`NormalizedEvent`] in zone `tz`.
///
/// Returns `None` when the title is blank or the start time is missing or
/// unparsable.
pub fn normalize_event(raw: &RawEvent, tz: &Tz) -> Option<NormalizedEvent> {
    let title = raw.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        debug!("dropping event without title");
        return None;
    }

    let parsed = match raw.starts_at.as_ref() {
        Some(RawStart::Zoned(dt)) => Some(ParsedStart::Zoned(*dt)),
        Some(RawStart::Wall(naive)) => Some(ParsedStart::Wall(*naive)),
        Some(RawStart::Text(text)) => parse_start_text(text),
        Some(RawStart::Unrecognized(_)) | None => None,
    };

    match parsed {
        Some(ParsedStart::Zoned(dt)) => Some(NormalizedEvent::new(title, dt.with_timezone(tz))),
        Some(ParsedStart::Wall(naive)) => Some(NormalizedEvent::from_wall_clock(title, naive, tz)),
        None => {
            debug!(title, starts_at = ?raw.starts_at, "dropping event without usable start time");
            None
        }
    }
}

/// A successfully parsed textual start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedStart {
    /// The text carried an offset (or `Z`).
    Zoned(DateTime<FixedOffset>),
    /// The text had no offset.
    Wall(NaiveDateTime),
}

/// Parses ISO-8601-like text.
///
/// The input is trimmed and a trailing `Z` is read as `+00:00`. Accepts
/// extended (`2025-06-01T18:00`) and basic (`20250601T1800`) forms, a `T` or
/// space separator, hour, minute or second precision, fractional seconds
/// after `.` or `,`, an optional `±HH[:MM]` offset, and bare dates (midnight).
pub fn parse_start_text(text: &str) -> Option<ParsedStart> {
    let trimmed = text.trim();
    let mut s = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };
    if let Some(comma) = s.find(',') {
        s.replace_range(comma..=comma, ".");
    }

    parse_full(&s).or_else(|| parse_full(&with_minutes(&s)?))
}

fn parse_full(s: &str) -> Option<ParsedStart> {
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(ParsedStart::Zoned(dt));
    }

    if let Some(naive) = WALL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(ParsedStart::Wall(naive));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(ParsedStart::Wall)
}

/// Expands hour precision (`2025-06-01T18`, optionally with an offset) to
/// `2025-06-01T18:00`.
fn with_minutes(s: &str) -> Option<String> {
    let hour_end = s.find(['T', ' ']).filter(|&i| i == 10)? + 3;
    let (head, tail) = s.split_at_checked(hour_end)?;
    let tail_ok = tail.is_empty() || tail.starts_with(['+', '-']);
    tail_ok.then(|| format!("{head}:00{tail}"))
}
