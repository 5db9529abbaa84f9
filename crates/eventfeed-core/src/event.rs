//! Event types for the normalization pipeline.
//!
//! This module provides the core types flowing through the pipeline:
//! - [`NormalizedEvent`]: a raw listing that passed validation, pinned to a zone
//! - [`OverrideRule`] and [`EventConfig`]: per-event settings selected by title
//! - [`OutputEvent`]: the wire record returned to callers

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{format_time_disp, format_time_iso_wall, format_time_local_hm};
use crate::time::resolve_local;

/// The configuration key holding the fallback rule.
pub const DEFAULT_RULE_KEY: &str = "default";

/// An event that has a usable title and a resolvable start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    /// The trimmed, non-empty title.
    pub title: String,
    /// Start time as shown on a clock in the requested zone.
    ///
    /// Offset-less inputs keep their numbers here even when they name a
    /// time skipped by a DST transition.
    pub wall_clock: NaiveDateTime,
    /// Start time as UTC epoch milliseconds.
    pub starts_at_utc_millis: i64,
}

impl NormalizedEvent {
    /// Creates a normalized event from a title and a zoned start time.
    pub fn new(title: impl Into<String>, starts_at: DateTime<Tz>) -> Self {
        Self {
            title: title.into(),
            wall_clock: starts_at.naive_local(),
            starts_at_utc_millis: starts_at.timestamp_millis(),
        }
    }

    /// Creates a normalized event from wall-clock numbers already local to
    /// `tz`. The instant follows [`resolve_local`].
    pub fn from_wall_clock(title: impl Into<String>, wall_clock: NaiveDateTime, tz: &Tz) -> Self {
        Self {
            title: title.into(),
            wall_clock,
            starts_at_utc_millis: resolve_local(tz, wall_clock).timestamp_millis(),
        }
    }
}

/// Settings applied to every event whose title matches a configuration key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Chat thread the event should be posted to.
    #[serde(default, deserialize_with = "deserialize_thread_id")]
    pub thread_id: Option<String>,
    /// Whether a reminder should be scheduled.
    #[serde(default)]
    pub reminder: bool,
}

impl OverrideRule {
    /// Builder method to set the thread id.
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        self.thread_id = (!thread_id.is_empty()).then_some(thread_id);
        self
    }

    /// Builder method to set the reminder flag.
    pub fn with_reminder(mut self, reminder: bool) -> Self {
        self.reminder = reminder;
        self
    }
}

/// Thread ids are often numeric in chat services; accept both shapes.
fn deserialize_thread_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ThreadId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<ThreadId>::deserialize(deserializer)? {
        Some(ThreadId::Text(s)) if !s.is_empty() => Some(s),
        Some(ThreadId::Number(n)) if n != 0 => Some(n.to_string()),
        _ => None,
    })
}

/// One `[[event_config]]` entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleEntry {
    /// Case-insensitive substring matched against event titles.
    pub key: String,
    #[serde(default, deserialize_with = "deserialize_thread_id")]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub reminder: bool,
}

/// Override rules in declaration order.
///
/// Matching is first-match over this order, so it is kept as a sequence of
/// pairs rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<RuleEntry>")]
pub struct EventConfig {
    rules: Vec<(String, OverrideRule)>,
}

impl From<Vec<RuleEntry>> for EventConfig {
    fn from(entries: Vec<RuleEntry>) -> Self {
        Self {
            rules: entries
                .into_iter()
                .map(|e| {
                    (
                        e.key,
                        OverrideRule {
                            thread_id: e.thread_id,
                            reminder: e.reminder,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl EventConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method appending a rule after the existing ones.
    pub fn with_rule(mut self, key: impl Into<String>, rule: OverrideRule) -> Self {
        self.rules.push((key.into(), rule));
        self
    }

    /// Returns the rule stored under `"default"`, if any.
    pub fn default_rule(&self) -> Option<&OverrideRule> {
        self.rules
            .iter()
            .find(|(key, _)| key == DEFAULT_RULE_KEY)
            .map(|(_, rule)| rule)
    }

    /// Iterates over `(key, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideRule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Returns the number of configured keys, `"default"` included.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no keys are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The record returned to callers, one per upcoming event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Event title.
    pub main: String,
    /// Resolved link, empty when none could be found.
    pub url: String,
    /// e.g. `"Sunday, June 01, 2025 at 02:00 AM"`.
    #[serde(rename = "timeDisp")]
    pub time_disp: String,
    /// e.g. `"02:00 AM"`.
    #[serde(rename = "timeLocalHM")]
    pub time_local_hm: String,
    /// Wall-clock `YYYY-MM-DDTHH:MM:SS`, used as the sort key.
    #[serde(rename = "timeISO")]
    pub time_iso: String,
    /// The Meetup feed has no all-day events.
    #[serde(rename = "isAllDay")]
    pub is_all_day: bool,
    /// Whole days between the baseline and the event start.
    #[serde(rename = "daysDiff")]
    pub days_diff: i64,
    pub thread_id: Option<String>,
    pub reminder: bool,
}

impl OutputEvent {
    /// Assembles the wire record for a normalized event.
    pub fn from_parts(
        event: &NormalizedEvent,
        url: impl Into<String>,
        days_diff: i64,
        rule: &OverrideRule,
    ) -> Self {
        let local = &event.wall_clock;
        Self {
            main: event.title.clone(),
            url: url.into(),
            time_disp: format_time_disp(local),
            time_local_hm: format_time_local_hm(local),
            time_iso: format_time_iso_wall(local),
            is_all_day: false,
            days_diff,
            thread_id: rule.thread_id.clone(),
            reminder: rule.reminder,
        }
    }
}
