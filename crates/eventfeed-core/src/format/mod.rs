//! Time formatting for output events.
//!
//! Three renderings are produced from an event's local wall-clock start:
//! - a long display form: `"Sunday, June 01, 2025 at 02:00 AM"`
//! - a short hour:minute form: `"02:00 AM"`
//! - a wall-clock ISO form without zone suffix: `"2025-06-01T02:00:00"`
//!
//! The ISO form is fixed-width and zero-padded, so lexicographic order matches
//! chronological order within a single zone.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use eventfeed_core::format::{format_time_iso_wall, format_time_local_hm};
//!
//! let dt = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(14, 5, 0).unwrap();
//! assert_eq!(format_time_local_hm(&dt), "02:05 PM");
//! assert_eq!(format_time_iso_wall(&dt), "2025-06-01T14:05:00");
//! ```

use chrono::NaiveDateTime;

const DISPLAY_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";
const LOCAL_HM_FORMAT: &str = "%I:%M %p";
const ISO_WALL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Long human-readable form, e.g. `"Sunday, June 01, 2025 at 02:00 AM"`.
pub fn format_time_disp(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// 12-hour clock time, e.g. `"02:00 AM"`.
pub fn format_time_local_hm(dt: &NaiveDateTime) -> String {
    dt.format(LOCAL_HM_FORMAT).to_string()
}

/// Wall-clock timestamp without offset, e.g. `"2025-06-01T02:00:00"`.
pub fn format_time_iso_wall(dt: &NaiveDateTime) -> String {
    dt.format(ISO_WALL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn display_form() {
        assert_eq!(
            format_time_disp(&wall(2025, 6, 1, 2, 0)),
            "Sunday, June 01, 2025 at 02:00 AM"
        );
        assert_eq!(
            format_time_disp(&wall(2025, 12, 24, 19, 30)),
            "Wednesday, December 24, 2025 at 07:30 PM"
        );
    }

    #[test]
    fn local_hm_noon_and_midnight() {
        assert_eq!(format_time_local_hm(&wall(2025, 6, 1, 12, 0)), "12:00 PM");
        assert_eq!(format_time_local_hm(&wall(2025, 6, 1, 0, 15)), "12:15 AM");
    }

    #[test]
    fn iso_wall_has_no_offset() {
        let iso = format_time_iso_wall(&wall(2025, 1, 9, 8, 7));
        assert_eq!(iso, "2025-01-09T08:07:00");
        assert!(!iso.contains('+') && !iso.ends_with('Z'));
    }

    #[test]
    fn iso_wall_sorts_chronologically() {
        let times = [
            wall(2025, 1, 9, 8, 7),
            wall(2025, 1, 9, 18, 0),
            wall(2025, 10, 1, 0, 0),
            wall(2026, 2, 1, 9, 0),
        ];
        let rendered: Vec<_> = times.iter().map(format_time_iso_wall).collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        assert_eq!(rendered, sorted);
    }

    #[test]
    fn seconds_are_kept_in_iso_only() {
        let dt = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 42)
            .unwrap();
        assert_eq!(format_time_iso_wall(&dt), "2025-06-01T09:00:42");
        assert_eq!(format_time_local_hm(&dt), "09:00 AM");
    }
}
