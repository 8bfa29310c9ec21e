use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::XpSource;

/// A user's progression snapshot, assembled on every read.
///
/// `level`, `level_progress`, `total_xp` and `today_xp` are derived from the
/// transaction ledger; `streak_count` comes from the streak row. Nothing in
/// this struct is an independently mutated counter, so a reader can at worst
/// see a slightly stale snapshot, never an inconsistent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    pub user_id: String,
    pub total_xp: i64,
    pub level: u32,
    /// Progress within the current level, in `[0, 1)`
    pub level_progress: f64,
    pub level_title: String,
    /// Consecutive-day streak as of today: 0 if the streak has lapsed
    pub streak_count: u32,
    pub best_streak: u32,
    pub last_active_day: Option<NaiveDate>,
    /// XP earned during the user's current local day
    pub today_xp: i64,
}

/// Persisted streak state for one user.
///
/// Only ever changed through the single `streak::advance` transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakSnapshot {
    pub current: u32,
    pub best: u32,
    pub last_active_day: Option<NaiveDate>,
}

/// Aggregates the achievement evaluator checks unlock rules against.
///
/// Derived from the ledger plus the referral provider on every evaluation;
/// never cached between grants.
#[derive(Debug, Clone, Default)]
pub struct AggregateStats {
    pub total_xp: i64,
    pub level: u32,
    pub streak_count: u32,
    pub best_streak: u32,
    /// Per-source `(transaction count, xp sum)` over accepted XP rows
    pub source_totals: HashMap<XpSource, (u64, i64)>,
    pub completed_referrals: u32,
}

impl AggregateStats {
    pub fn source_count(&self, source: XpSource) -> u64 {
        self.source_totals.get(&source).map(|(n, _)| *n).unwrap_or(0)
    }

    pub fn source_xp(&self, source: XpSource) -> i64 {
        self.source_totals.get(&source).map(|(_, xp)| *xp).unwrap_or(0)
    }

    /// Number of distinct activity sources the user has earned XP from.
    /// Reward credits don't count as activities.
    pub fn distinct_activity_sources(&self) -> u64 {
        self.source_totals
            .keys()
            .filter(|s| !matches!(s, XpSource::AchievementReward | XpSource::TierReward))
            .count() as u64
    }
}
