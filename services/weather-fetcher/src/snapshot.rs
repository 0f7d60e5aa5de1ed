//! Snapshot time resolution.
//!
//! The portal materializes station data at every 10-minute wall-clock mark
//! and needs a while to finish writing the newest one. Queries therefore ask
//! for the mark before the most recent one: 10:37 → 10:30 → 10:20.
//!
//! There is no guarantee from the server that this snapshot exists; see
//! `snapshot.step_back_attempts` for walking further back on rejection.

use chrono::{Duration, FixedOffset, Local, NaiveDateTime, Timelike, Utc};

use crate::error::{FetchError, Result};

/// Spacing of server-side snapshots.
pub const SNAPSHOT_INTERVAL_MINUTES: u32 = 10;

/// `data_time` form field format.
pub const SNAPSHOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock, in local time or at a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Machine local time.
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Local time at `hours` east of UTC (Taiwan is +8).
    pub fn with_offset_hours(hours: i32) -> Result<Self> {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| FetchError::Config(format!("UTC offset out of range: {hours}h")))?;
        Ok(Self {
            offset: Some(offset),
        })
    }

    pub fn from_config(utc_offset_hours: Option<i32>) -> Result<Self> {
        match utc_offset_hours {
            Some(hours) => Self::with_offset_hours(hours),
            None => Ok(Self::local()),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Snapshot to request at wall-clock time `now`.
///
/// Truncates to the 10-minute mark (dropping seconds and sub-seconds), then
/// steps back one more interval. The result is always 10 to 20 minutes
/// before `now`, with a minute that is a multiple of 10.
pub fn resolve_snapshot_time(now: NaiveDateTime) -> NaiveDateTime {
    let into_interval = Duration::minutes(i64::from(now.minute() % SNAPSHOT_INTERVAL_MINUTES))
        + Duration::seconds(i64::from(now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));

    step_back(now - into_interval)
}

/// The snapshot one interval before `snapshot`.
pub fn step_back(snapshot: NaiveDateTime) -> NaiveDateTime {
    snapshot - Duration::minutes(i64::from(SNAPSHOT_INTERVAL_MINUTES))
}

pub fn format_snapshot_time(snapshot: NaiveDateTime) -> String {
    snapshot.format(SNAPSHOT_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, nano: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nano)
            .unwrap()
    }

    #[test]
    fn test_resolves_previous_mark() {
        let snapshot = resolve_snapshot_time(at(10, 37, 0, 0));
        assert_eq!(format_snapshot_time(snapshot), "2024-01-01 10:20:00");
    }

    #[test]
    fn test_exact_mark_still_steps_back() {
        let snapshot = resolve_snapshot_time(at(10, 30, 0, 0));
        assert_eq!(format_snapshot_time(snapshot), "2024-01-01 10:20:00");
    }

    #[test]
    fn test_drops_seconds_and_subseconds() {
        let snapshot = resolve_snapshot_time(at(10, 39, 59, 999_999_999));
        assert_eq!(snapshot, at(10, 20, 0, 0));
    }

    #[test]
    fn test_crosses_midnight() {
        let snapshot = resolve_snapshot_time(at(0, 4, 12, 0));
        assert_eq!(format_snapshot_time(snapshot), "2023-12-31 23:50:00");
    }

    #[test]
    fn test_offset_window_over_a_whole_hour() {
        for minute in 0..60 {
            for second in [0, 1, 30, 59] {
                let now = at(13, minute, second, 500_000_000);
                let snapshot = resolve_snapshot_time(now);
                let lag = now - snapshot;

                assert!(snapshot < now);
                assert!(lag >= Duration::minutes(10), "lag {lag} at {now}");
                assert!(lag < Duration::minutes(20), "lag {lag} at {now}");
                assert_eq!(snapshot.minute() % 10, 0);
                assert_eq!(snapshot.second(), 0);
                assert_eq!(snapshot.nanosecond(), 0);
            }
        }
    }

    #[test]
    fn test_step_back() {
        assert_eq!(step_back(at(10, 20, 0, 0)), at(10, 10, 0, 0));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(at(8, 0, 0, 0));
        assert_eq!(clock.now(), at(8, 0, 0, 0));
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(SystemClock::with_offset_hours(8).is_ok());
        assert!(SystemClock::with_offset_hours(30).is_err());
    }
}
