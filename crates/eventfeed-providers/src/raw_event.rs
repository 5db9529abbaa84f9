//! Raw event type from scraped listings.
//!
//! This module defines [`RawEvent`], a loosely-typed record as extracted from
//! an event page before normalization. Nothing about it is guaranteed: every
//! field may be missing or hold an unexpected shape, and the normalizer decides
//! what is usable.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value;

/// The start time of a raw event, in whatever shape the source provided.
#[derive(Debug, Clone, PartialEq)]
pub enum RawStart {
    /// A timestamp that carries its own offset.
    Zoned(DateTime<FixedOffset>),
    /// A wall-clock timestamp with no offset.
    Wall(NaiveDateTime),
    /// Text that may or may not be an ISO-8601 timestamp.
    Text(String),
    /// Any other JSON value (numbers, objects, ...). Never usable.
    Unrecognized(Value),
}

impl RawStart {
    /// Classifies a JSON value. `null` means "absent" and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Unrecognized(other.clone())),
        }
    }
}

/// A raw event listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    /// The event title.
    pub title: Option<String>,
    /// When the event starts.
    pub starts_at: Option<RawStart>,
    /// Link to the event page.
    pub url: Option<String>,
    /// Free-text description, possibly containing links.
    pub description: Option<String>,
}

impl RawEvent {
    /// Creates an empty raw event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a raw event from a JSON object using the given field names.
    ///
    /// Non-string values for the text fields are treated as absent.
    pub fn from_json_fields(value: &Value, fields: &JsonFields) -> Self {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            title: text(fields.title),
            starts_at: value.get(fields.starts_at).and_then(RawStart::from_json),
            url: text(fields.url),
            description: text(fields.description),
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set a textual start time.
    pub fn with_start_text(mut self, starts_at: impl Into<String>) -> Self {
        self.starts_at = Some(RawStart::Text(starts_at.into()));
        self
    }

    /// Builder method to set the start time.
    pub fn with_start(mut self, starts_at: RawStart) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field names used to read a [`RawEvent`] out of a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFields {
    pub title: &'static str,
    pub starts_at: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

impl JsonFields {
    /// Field names of Meetup's embedded GraphQL `Event` objects.
    pub const MEETUP: Self = Self {
        title: "title",
        starts_at: "dateTime",
        url: "eventUrl",
        description: "description",
    };

    /// Field names of schema.org `Event` objects in JSON-LD blocks.
    pub const SCHEMA_ORG: Self = Self {
        title: "name",
        starts_at: "startDate",
        url: "url",
        description: "description",
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder() {
        let event = RawEvent::new()
            .with_title("Rust Night")
            .with_start_text("2025-06-01T18:00:00-07:00")
            .with_url("https://meetup.test/e/1")
            .with_description("Talks and pizza");

        assert_eq!(event.title.as_deref(), Some("Rust Night"));
        assert_eq!(
            event.starts_at,
            Some(RawStart::Text("2025-06-01T18:00:00-07:00".to_string()))
        );
        assert_eq!(event.url.as_deref(), Some("https://meetup.test/e/1"));
    }

    #[test]
    fn reads_meetup_fields() {
        let value = json!({
            "__typename": "Event",
            "title": "Hack Night",
            "dateTime": "2025-06-05T18:30:00-07:00",
            "eventUrl": "https://www.meetup.com/g/events/1/",
            "description": "Bring a laptop"
        });
        let event = RawEvent::from_json_fields(&value, &JsonFields::MEETUP);
        assert_eq!(event.title.as_deref(), Some("Hack Night"));
        assert_eq!(event.url.as_deref(), Some("https://www.meetup.com/g/events/1/"));
        assert_eq!(event.description.as_deref(), Some("Bring a laptop"));
        assert!(matches!(event.starts_at, Some(RawStart::Text(_))));
    }

    #[test]
    fn non_string_fields_are_loose() {
        let value = json!({
            "name": 42,
            "startDate": 1_717_000_000,
            "url": null
        });
        let event = RawEvent::from_json_fields(&value, &JsonFields::SCHEMA_ORG);
        assert_eq!(event.title, None);
        assert_eq!(event.url, None);
        assert_eq!(event.description, None);
        assert!(matches!(event.starts_at, Some(RawStart::Unrecognized(_))));
    }

    #[test]
    fn null_start_is_absent() {
        assert_eq!(RawStart::from_json(&Value::Null), None);
    }
}
