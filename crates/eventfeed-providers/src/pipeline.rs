//! Raw listings to sorted output events.
//!
//! For each raw event, in order:
//! 1. normalize it (drop on rejection)
//! 2. drop it if it starts before the baseline, else compute `daysDiff`
//! 3. resolve its link
//! 4. pick its override rule
//! 5. render the output record
//!
//! The result is sorted by the wall-clock ISO string.

use chrono_tz::Tz;
use tracing::debug;

use eventfeed_core::{EventConfig, OutputEvent, TimeBaseline, pick_rule, resolve_link};

use crate::normalize::normalize_event;
use crate::raw_event::RawEvent;

/// Turns raw listings into the ordered list of upcoming events.
///
/// This is a pure function of its inputs: the caller supplies the zone, the
/// baseline and one configuration snapshot.
pub fn build_output_events(
    raw_events: &[RawEvent],
    tz: &Tz,
    baseline: TimeBaseline,
    event_config: &EventConfig,
) -> Vec<OutputEvent> {
    let mut items: Vec<OutputEvent> = raw_events
        .iter()
        .filter_map(|raw| build_one(raw, tz, baseline, event_config))
        .collect();

    items.sort_by(|a, b| a.time_iso.cmp(&b.time_iso));

    debug!(
        raw = raw_events.len(),
        kept = items.len(),
        tz = %tz,
        "built output events"
    );
    items
}

fn build_one(
    raw: &RawEvent,
    tz: &Tz,
    baseline: TimeBaseline,
    event_config: &EventConfig,
) -> Option<OutputEvent> {
    let event = normalize_event(raw, tz)?;

    if baseline.is_before(event.starts_at_utc_millis) {
        debug!(title = %event.title, "dropping event that started before baseline");
        return None;
    }
    let days_diff = baseline.days_until(event.starts_at_utc_millis);

    let link = resolve_link(raw.url.as_deref(), raw.description.as_deref());
    let rule = pick_rule(&event.title, event_config);

    Some(OutputEvent::from_parts(&event, link, days_diff, &rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventfeed_core::{MILLIS_PER_DAY, OverrideRule};

    const LA: Tz = chrono_tz::America::Los_Angeles;

    fn baseline_at(y: i32, m: u32, d: u32, h: u32) -> TimeBaseline {
        TimeBaseline {
            utc_millis: Utc
                .with_ymd_and_hms(y, m, d, h, 0, 0)
                .unwrap()
                .timestamp_millis(),
        }
    }

    fn raw(title: &str, start: &str) -> RawEvent {
        RawEvent::new().with_title(title).with_start_text(start)
    }

    /// 2025-06-01 01:00 PDT
    fn june_first() -> TimeBaseline {
        baseline_at(2025, 6, 1, 8)
    }

    mod filtering {
        use super::*;

        #[test]
        fn drops_events_before_baseline() {
            let events = vec![
                raw("Yesterday", "2025-05-31T19:00:00"),
                raw("Just before cutoff", "2025-06-01T00:59:59"),
                raw("At cutoff", "2025-06-01T01:00:00"),
                raw("Tonight", "2025-06-01T19:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            let titles: Vec<_> = out.iter().map(|e| e.main.as_str()).collect();
            assert_eq!(titles, vec!["At cutoff", "Tonight"]);
        }

        #[test]
        fn malformed_events_do_not_fail_batch() {
            let events = vec![
                raw("   ", "2025-06-02T19:00:00"),
                raw("Bad date", "not-a-date"),
                RawEvent::new().with_title("No date"),
                raw("Good", "2025-06-02T19:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].main, "Good");
        }

        #[test]
        fn each_kept_event_appears_once() {
            let events: Vec<_> = (1..=5)
                .map(|d| raw(&format!("Day {d}"), &format!("2025-06-0{d}T12:00:00")))
                .collect();
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert_eq!(out.len(), 5);
            for d in 1..=5 {
                let title = format!("Day {d}");
                assert_eq!(out.iter().filter(|e| e.main == title).count(), 1);
            }
        }
    }

    mod days_diff {
        use super::*;

        #[test]
        fn floor_divides_from_baseline() {
            let events = vec![
                raw("Same day", "2025-06-01T23:00:00"),
                raw("Next day before 1am", "2025-06-02T00:30:00"),
                raw("Next day after 1am", "2025-06-02T01:00:00"),
                raw("Week later", "2025-06-08T18:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            let diffs: Vec<_> = out.iter().map(|e| (e.main.as_str(), e.days_diff)).collect();
            assert_eq!(
                diffs,
                vec![
                    ("Same day", 0),
                    ("Next day before 1am", 0),
                    ("Next day after 1am", 1),
                    ("Week later", 7),
                ]
            );
        }

        #[test]
        fn never_negative() {
            let baseline = june_first();
            let events: Vec<_> = (0..48)
                .map(|h| {
                    let ms = baseline.utc_millis - 12 * 3_600_000 + h * 3_600_000;
                    let dt = Utc.timestamp_millis_opt(ms).unwrap();
                    raw("e", &dt.to_rfc3339())
                })
                .collect();
            let out = build_output_events(&events, &LA, baseline, &EventConfig::new());
            assert_eq!(out.len(), 36);
            assert!(out.iter().all(|e| e.days_diff >= 0));
            assert!(out.iter().all(|e| e.days_diff <= 36 * 3_600_000 / MILLIS_PER_DAY));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn sorted_by_wall_clock_iso() {
            let events = vec![
                raw("C", "2025-06-03T09:00:00"),
                raw("A", "2025-06-01T22:00:00-07:00"),
                raw("B", "2025-06-02T16:00:00Z"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            let titles: Vec<_> = out.iter().map(|e| e.main.as_str()).collect();
            assert_eq!(titles, vec!["A", "B", "C"]);
            assert!(out.windows(2).all(|w| w[0].time_iso <= w[1].time_iso));
        }

        #[test]
        fn equal_times_keep_input_order() {
            let events = vec![
                raw("First", "2025-06-02T18:00:00"),
                raw("Second", "2025-06-02T18:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert_eq!(out[0].main, "First");
            assert_eq!(out[1].main, "Second");
        }
    }

    mod enrichment {
        use super::*;

        #[test]
        fn utc_start_rendered_in_zone() {
            let events = vec![raw("Morning", "2025-06-01T09:00:00Z")];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert_eq!(out[0].time_local_hm, "02:00 AM");
            assert_eq!(out[0].time_iso, "2025-06-01T02:00:00");
            assert_eq!(out[0].time_disp, "Sunday, June 01, 2025 at 02:00 AM");
            assert!(!out[0].is_all_day);
        }

        #[test]
        fn skipped_local_time_keeps_written_numbers() {
            // Clocks jump from 02:00 to 03:00 on 2025-03-09 in Los Angeles.
            let events = vec![
                raw("After jump", "2025-03-09T03:15:00"),
                raw("Gap", "2025-03-09T02:30:00"),
            ];
            // 2025-03-09 01:00 PST
            let baseline = baseline_at(2025, 3, 9, 9);
            let out = build_output_events(&events, &LA, baseline, &EventConfig::new());
            assert_eq!(out[0].main, "Gap");
            assert_eq!(out[0].time_iso, "2025-03-09T02:30:00");
            assert_eq!(out[0].time_local_hm, "02:30 AM");
            assert_eq!(out[0].time_disp, "Sunday, March 09, 2025 at 02:30 AM");
            assert_eq!(out[0].days_diff, 0);
            assert_eq!(out[1].time_iso, "2025-03-09T03:15:00");
        }

        #[test]
        fn no_rules_means_defaults() {
            let events = vec![raw("Talk", "2025-06-02T18:00:00")];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert!(!out[0].reminder);
            assert_eq!(out[0].thread_id, None);
        }

        #[test]
        fn rule_matched_on_trimmed_title() {
            let config = EventConfig::new()
                .with_rule("default", OverrideRule::default().with_thread_id("general"))
                .with_rule(
                    "hack night",
                    OverrideRule::default()
                        .with_thread_id("hack")
                        .with_reminder(true),
                );
            let events = vec![
                raw("  Rust Hack Night  ", "2025-06-02T18:00:00"),
                raw("Talks", "2025-06-03T18:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &config);
            assert_eq!(out[0].main, "Rust Hack Night");
            assert_eq!(out[0].thread_id.as_deref(), Some("hack"));
            assert!(out[0].reminder);
            assert_eq!(out[1].thread_id.as_deref(), Some("general"));
            assert!(!out[1].reminder);
        }

        #[test]
        fn link_from_url_or_description() {
            let events = vec![
                raw("Declared", "2025-06-02T18:00:00")
                    .with_url(" https://meetup.test/e/1 ")
                    .with_description("see https://other.test"),
                raw("Described", "2025-06-03T18:00:00")
                    .with_description("Join us (https://x.test/e/1))"),
                raw("Nothing", "2025-06-04T18:00:00"),
            ];
            let out = build_output_events(&events, &LA, june_first(), &EventConfig::new());
            assert_eq!(out[0].url, "https://meetup.test/e/1");
            assert_eq!(out[1].url, "https://x.test/e/1)");
            assert_eq!(out[2].url, "");
        }
    }

    #[test]
    fn empty_input() {
        let out = build_output_events(&[], &LA, june_first(), &EventConfig::new());
        assert!(out.is_empty());
    }
}
