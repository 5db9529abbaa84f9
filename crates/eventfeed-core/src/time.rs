//! Time zone resolution and the daily cutoff baseline.
//!
//! This module provides:
//! - [`resolve_zone`] for turning an IANA identifier into a [`Tz`]
//! - [`resolve_local`] for attaching a zone to wall-clock numbers
//! - [`TimeBaseline`], the "today at 01:00 local" instant used to decide
//!   whether an event is still upcoming

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Local time of day at which "today" starts for filtering purposes.
const CUTOFF_HOUR: u32 = 1;

/// Resolves an IANA time zone identifier (e.g. `"America/Los_Angeles"`).
///
/// Unknown identifiers fail with [`CoreError::InvalidTimeZone`].
pub fn resolve_zone(name: &str) -> CoreResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::invalid_time_zone(name))
}

/// Attaches `tz` to a wall-clock datetime.
///
/// - Unambiguous local times map directly.
/// - Ambiguous times (clocks going back) resolve to the earlier instant.
/// - Times inside a gap (clocks going forward) are read with the offset in
///   effect before the transition, so `02:30` on a spring-forward night in
///   `America/Los_Angeles` is the instant `10:30Z`.
///
/// Only the instant is meaningful for gap times; callers that display the
/// time keep the original wall-clock numbers.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut earlier = naive;
            // Gaps are at most a few hours; step back until we leave it.
            for _ in 0..48 {
                earlier -= Duration::minutes(30);
                if let Some(before) = tz.from_local_datetime(&earlier).earliest() {
                    let offset =
                        Duration::seconds(i64::from(before.offset().fix().local_minus_utc()));
                    return tz.from_utc_datetime(&(naive - offset));
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}

/// The instant before which events are considered already started.
///
/// The baseline is 01:00:00 local time on the current local date in the
/// requested zone, so events from earlier "today" are kept while anything
/// that began before 01:00 is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBaseline {
    /// The baseline as UTC epoch milliseconds.
    pub utc_millis: i64,
}

impl TimeBaseline {
    /// Computes the baseline for `tz` as seen at the instant `now`.
    pub fn at(tz: &Tz, now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(tz).date_naive();
        let cutoff = today.and_time(
            NaiveTime::from_hms_opt(CUTOFF_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
        );
        let local = resolve_local(tz, cutoff);
        Self {
            utc_millis: local.timestamp_millis(),
        }
    }

    /// Returns `true` if an event starting at `starts_at_millis` is before the
    /// baseline.
    pub fn is_before(&self, starts_at_millis: i64) -> bool {
        starts_at_millis < self.utc_millis
    }

    /// Whole days between the baseline and `starts_at_millis`, floor-divided.
    pub fn days_until(&self, starts_at_millis: i64) -> i64 {
        (starts_at_millis - self.utc_millis).div_euclid(MILLIS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    mod zones {
        use super::*;

        #[test]
        fn resolves_known_zone() {
            let tz = resolve_zone("America/Los_Angeles").unwrap();
            assert_eq!(tz, chrono_tz::America::Los_Angeles);
        }

        #[test]
        fn rejects_empty_name() {
            assert!(resolve_zone("").is_err());
        }

        #[test]
        fn rejects_unknown_zone() {
            let err = resolve_zone("Mars/Olympus_Mons").unwrap_err();
            assert!(matches!(err, CoreError::InvalidTimeZone { .. }));
            assert!(err.to_string().contains("Mars/Olympus_Mons"));
        }
    }

    mod local_resolution {
        use super::*;

        #[test]
        fn unambiguous_time() {
            let tz = chrono_tz::America::Los_Angeles;
            let dt = resolve_local(&tz, naive(2025, 6, 1, 2, 0));
            assert_eq!(dt.with_timezone(&Utc), utc(2025, 6, 1, 9, 0, 0));
        }

        #[test]
        fn ambiguous_time_takes_earliest() {
            // 2025-11-02 01:30 happens twice in Los Angeles.
            let tz = chrono_tz::America::Los_Angeles;
            let dt = resolve_local(&tz, naive(2025, 11, 2, 1, 30));
            assert_eq!(dt.with_timezone(&Utc), utc(2025, 11, 2, 8, 30, 0));
        }

        #[test]
        fn gap_time_uses_offset_before_transition() {
            // 2025-03-09 02:30 does not exist in Los Angeles; read with PST.
            let tz = chrono_tz::America::Los_Angeles;
            let dt = resolve_local(&tz, naive(2025, 3, 9, 2, 30));
            assert_eq!(dt.with_timezone(&Utc), utc(2025, 3, 9, 10, 30, 0));
        }

        #[test]
        fn gap_in_positive_offset_zone() {
            // 2025-03-30 02:30 does not exist in Paris; read with CET.
            let tz = chrono_tz::Europe::Paris;
            let dt = resolve_local(&tz, naive(2025, 3, 30, 2, 30));
            assert_eq!(dt.with_timezone(&Utc), utc(2025, 3, 30, 1, 30, 0));
        }
    }

    mod baseline {
        use super::*;

        #[test]
        fn one_am_local_today() {
            let tz = chrono_tz::America::Los_Angeles;
            // 2025-06-01 15:00 PDT
            let baseline = TimeBaseline::at(&tz, utc(2025, 6, 1, 22, 0, 0));
            assert_eq!(
                baseline.utc_millis,
                utc(2025, 6, 1, 8, 0, 0).timestamp_millis()
            );
        }

        #[test]
        fn uses_local_date_not_utc_date() {
            let tz = chrono_tz::America::Los_Angeles;
            // 2025-06-02 03:00 UTC is still 2025-06-01 in Los Angeles.
            let baseline = TimeBaseline::at(&tz, utc(2025, 6, 2, 3, 0, 0));
            assert_eq!(
                baseline.utc_millis,
                utc(2025, 6, 1, 8, 0, 0).timestamp_millis()
            );
        }

        #[test]
        fn before_cutoff_still_same_day() {
            let tz = chrono_tz::Europe::Paris;
            // 00:30 local on 2025-01-15 (UTC+1)
            let baseline = TimeBaseline::at(&tz, utc(2025, 1, 14, 23, 30, 0));
            assert_eq!(
                baseline.utc_millis,
                utc(2025, 1, 15, 0, 0, 0).timestamp_millis()
            );
        }

        #[test]
        fn is_before_and_days_until() {
            let baseline = TimeBaseline { utc_millis: 0 };
            assert!(baseline.is_before(-1));
            assert!(!baseline.is_before(0));
            assert_eq!(baseline.days_until(0), 0);
            assert_eq!(baseline.days_until(MILLIS_PER_DAY - 1), 0);
            assert_eq!(baseline.days_until(MILLIS_PER_DAY), 1);
            assert_eq!(baseline.days_until(3 * MILLIS_PER_DAY + 5), 3);
        }
    }
}
