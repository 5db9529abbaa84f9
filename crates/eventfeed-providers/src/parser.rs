//! Event page parsing.
//!
//! [`EventParser`] turns fetched page bytes into [`RawEvent`]s. The provided
//! [`MeetupPageParser`] understands two embedded data sources:
//!
//! - the `__NEXT_DATA__` script, a JSON document in which every event is an
//!   object tagged `"__typename": "Event"`, possibly repeated in several
//!   places of the tree
//! - `application/ld+json` scripts holding schema.org `Event` objects
//!
//! The first source wins when present. A page with neither is a parse error;
//! a recognized page with no events is an empty list.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{JsonFields, RawEvent};

static NEXT_DATA_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script#__NEXT_DATA__"#).expect("valid __NEXT_DATA__ selector")
});

static LD_JSON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});

/// Extracts raw event listings from page bytes.
pub trait EventParser: Send + Sync {
    /// Parses `bytes` into raw events.
    ///
    /// Fails only when the content is not recognizable as an event page.
    fn parse(&self, bytes: &[u8]) -> ProviderResult<Vec<RawEvent>>;
}

/// Parser for Meetup group event pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetupPageParser;

impl MeetupPageParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl EventParser for MeetupPageParser {
    fn parse(&self, bytes: &[u8]) -> ProviderResult<Vec<RawEvent>> {
        let html = String::from_utf8_lossy(bytes);
        let document = Html::parse_document(&html);

        if let Some(next_data) = next_data_json(&document)? {
            let events = events_from_next_data(&next_data);
            debug!(count = events.len(), "Parsed events from __NEXT_DATA__");
            return Ok(events);
        }

        let blocks = ld_json_blocks(&document);
        if blocks.is_empty() {
            return Err(ProviderError::parse("no embedded event data found in page"));
        }

        let events = events_from_ld_json(&blocks);
        debug!(
            blocks = blocks.len(),
            count = events.len(),
            "Parsed events from JSON-LD"
        );
        Ok(events)
    }
}

fn script_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect()
}

/// Returns the `__NEXT_DATA__` document, if the page has one.
fn next_data_json(document: &Html) -> ProviderResult<Option<Value>> {
    let Some(element) = document.select(&NEXT_DATA_SELECTOR).next() else {
        return Ok(None);
    };
    serde_json::from_str(&script_text(element))
        .map(Some)
        .map_err(|e| {
            ProviderError::parse(format!("invalid __NEXT_DATA__ JSON: {}", e)).with_source(e)
        })
}

/// Returns every JSON-LD block that parses. Malformed blocks are skipped.
fn ld_json_blocks(document: &Html) -> Vec<Value> {
    document
        .select(&LD_JSON_SELECTOR)
        .filter_map(|element| match serde_json::from_str(&script_text(element)) {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(error = %e, "Skipping malformed JSON-LD block");
                None
            }
        })
        .collect()
}

fn events_from_next_data(root: &Value) -> Vec<RawEvent> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();
    collect_typed(root, &mut |object| {
        if object.get("__typename").and_then(Value::as_str) != Some("Event") {
            return;
        }
        if object.get("id").map(id_key).is_some_and(|id| !seen.insert(id)) {
            return;
        }
        events.push(RawEvent::from_json_fields(object, &JsonFields::MEETUP));
    });
    events
}

fn events_from_ld_json(blocks: &[Value]) -> Vec<RawEvent> {
    let mut events = Vec::new();
    for block in blocks {
        collect_typed(block, &mut |object| {
            if is_schema_event(object) {
                events.push(RawEvent::from_json_fields(object, &JsonFields::SCHEMA_ORG));
            }
        });
    }
    events
}

/// Visits every JSON object in the tree, parents before children.
fn collect_typed(value: &Value, visit: &mut dyn FnMut(&Value)) {
    match value {
        Value::Object(map) => {
            visit(value);
            for child in map.values() {
                collect_typed(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_typed(item, visit);
            }
        }
        _ => {}
    }
}

/// `@type` may be a string or a list of strings.
fn is_schema_event(object: &Value) -> bool {
    match object.get("@type") {
        Some(Value::String(t)) => t == "Event",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Event")),
        _ => false,
    }
}

fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
