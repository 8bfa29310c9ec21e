//! Achievement evaluation logic

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::definitions::{ACHIEVEMENTS, Achievement, AchievementCategory, UnlockRule};
use crate::domain::AggregateStats;

/// Re-check every not-yet-unlocked achievement against current aggregates.
///
/// Pure: the caller persists the unlocks (guarded by the table's uniqueness
/// key) and reports each one exactly once. Re-evaluating an already-unlocked
/// achievement is a silent no-op here because it is filtered out up front.
pub fn evaluate(
    stats: &AggregateStats,
    unlocked: &HashSet<String>,
) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !unlocked.contains(a.id.as_str()))
        .filter(|a| satisfied(&a.rule, stats))
        .collect()
}

fn satisfied(rule: &UnlockRule, stats: &AggregateStats) -> bool {
    match rule {
        UnlockRule::TotalXpAtLeast(xp) => stats.total_xp >= *xp,
        UnlockRule::LevelAtLeast(level) => stats.level >= *level,
        UnlockRule::StreakAtLeast(days) => stats.streak_count >= *days,
        UnlockRule::SourceCountAtLeast(source, count) => stats.source_count(*source) >= *count,
        UnlockRule::SourceXpAtLeast(source, xp) => stats.source_xp(*source) >= *xp,
        UnlockRule::DistinctSourcesAtLeast(n) => stats.distinct_activity_sources() >= *n,
        UnlockRule::ReferralsAtLeast(n) => stats.completed_referrals >= *n,
    }
}

/// Catalog entry plus the user's unlock state, for the achievements screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub xp_reward: i64,
    pub unlocked: bool,
    /// Milliseconds since epoch, present when unlocked
    pub unlocked_at: Option<i64>,
}

impl AchievementStatus {
    pub fn from_definition(achievement: &Achievement, unlocked_at: Option<i64>) -> Self {
        Self {
            id: achievement.id.as_str().to_string(),
            name: achievement.name.to_string(),
            description: achievement.description.to_string(),
            icon: achievement.icon.to_string(),
            category: achievement.category,
            xp_reward: achievement.xp_reward,
            unlocked: unlocked_at.is_some(),
            unlocked_at,
        }
    }
}
