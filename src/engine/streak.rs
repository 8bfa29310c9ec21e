//! Daily streak state machine
//!
//! Transitions run on the user's local calendar day. The stored row only
//! ever changes through `advance`, and `advance` is called with the day the
//! qualifying activity happened - so two devices reporting activity on the
//! same local day converge on the same state.

use chrono::{DateTime, NaiveDate, Utc};

use crate::clock;
use crate::domain::StreakSnapshot;

/// Result of applying one qualifying activity day to the streak
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakTransition {
    pub snapshot: StreakSnapshot,
    /// True when the streak count changed (first day, extension, or reset)
    pub changed: bool,
    /// True when the streak grew (not a same-day repeat, not a reset to 1
    /// from a longer streak)
    pub extended: bool,
}

/// Apply a qualifying activity on `today` to the previous streak state.
///
/// - same day as `last_active_day`: no transition, already counted
/// - exactly one day later: streak extends
/// - longer gap (a missed day): streak resets, today is day one
/// - first-ever activity: streak starts at 1
pub fn advance(prev: &StreakSnapshot, today: NaiveDate) -> StreakTransition {
    let current = match prev.last_active_day {
        Some(last) => {
            let gap = (today - last).num_days();
            if gap <= 0 {
                // Already counted today (or the clock went backwards);
                // leave the streak untouched
                return StreakTransition {
                    snapshot: prev.clone(),
                    changed: false,
                    extended: false,
                };
            } else if gap == 1 {
                prev.current + 1
            } else {
                1
            }
        }
        None => 1,
    };

    let snapshot = StreakSnapshot {
        current,
        best: current.max(prev.best),
        last_active_day: Some(today),
    };
    let extended = current > prev.current || prev.last_active_day.is_none();
    StreakTransition {
        snapshot,
        changed: true,
        extended,
    }
}

/// The streak count a reader should see as of `today`: the stored count
/// while the streak is alive, 0 once a day has been missed
pub fn effective_count(snapshot: &StreakSnapshot, today: NaiveDate) -> u32 {
    match snapshot.last_active_day {
        Some(last) if (today - last).num_days() <= 1 => snapshot.current,
        _ => 0,
    }
}

/// The instant the current streak lapses if no further activity occurs.
/// `None` when there is no live streak to lose.
pub fn reset_time(
    snapshot: &StreakSnapshot,
    today: NaiveDate,
    utc_offset_minutes: i32,
) -> Option<DateTime<Utc>> {
    let last = snapshot.last_active_day?;
    if (today - last).num_days() > 1 {
        return None;
    }
    Some(clock::streak_lapse_instant(last, utc_offset_minutes))
}
