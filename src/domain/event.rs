use serde::{Deserialize, Serialize};

use super::transaction::XpSource;

/// Fire-and-forget signals for transient celebratory UI.
///
/// Emitted alongside a grant outcome; dropping them has no correctness
/// impact. None of these are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressionEvent {
    XpAwarded {
        amount: i64,
        source: XpSource,
    },
    StreakExtended {
        count: u32,
    },
    LevelUp {
        old_level: u32,
        new_level: u32,
        new_title: String,
    },
    AchievementUnlocked {
        achievement_id: String,
        name: String,
        xp_reward: i64,
    },
}
