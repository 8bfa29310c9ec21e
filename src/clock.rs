//! Clock abstraction and local-day helpers
//!
//! Streak logic runs on the *user's* local calendar day, not UTC and not the
//! server's timezone, so a travelling user doesn't lose a streak to a
//! midnight-boundary surprise. The user's timezone arrives as a UTC offset
//! in minutes from the profile provider; all day math goes through the
//! helpers here.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// Source of the current instant.
///
/// Injected into the engine so tests can pin and advance time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable instant, for tests and replay
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// The user's local calendar day for a given instant
pub fn local_day(now: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    let offset = clamp_offset(utc_offset_minutes);
    now.with_timezone(&offset).date_naive()
}

/// The instant the current streak lapses: local midnight at the end of the
/// day *following* `last_active_day`. Advisory for UI countdowns only;
/// always recomputed, never stored.
pub fn streak_lapse_instant(last_active_day: NaiveDate, utc_offset_minutes: i32) -> DateTime<Utc> {
    let offset = clamp_offset(utc_offset_minutes);
    let lapse_day = last_active_day + Duration::days(2);
    let midnight = lapse_day.and_hms_opt(0, 0, 0).expect("valid midnight");
    midnight
        .and_local_timezone(offset)
        .single()
        .expect("fixed offsets have no DST gaps")
        .with_timezone(&Utc)
}

// Offsets past +/-18h don't exist; fall back to UTC rather than panic on
// bad provider data.
fn clamp_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
}
