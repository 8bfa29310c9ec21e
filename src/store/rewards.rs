//! Achievement unlock and reward claim persistence
//!
//! Both tables enforce exactly-once with a primary-key conditional insert:
//! `INSERT OR IGNORE` either wins the row or changes nothing, which is the
//! compare-and-swap concurrent claims race on.

use std::collections::HashMap;

use super::db::ProgressionDb;
use crate::domain::ProgressionError;

/// Interface over `achievement_unlocks` and `reward_tier_claims`
#[derive(Clone)]
pub struct RewardStore {
    db: ProgressionDb,
}

impl RewardStore {
    pub fn new(db: ProgressionDb) -> Self {
        Self { db }
    }

    /// Record an achievement unlock. Returns `false` if it was already
    /// unlocked (no row written).
    pub fn insert_unlock(
        &self,
        user_id: &str,
        achievement_id: &str,
        now_ms: i64,
    ) -> Result<bool, ProgressionError> {
        let conn = self.db.conn();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO achievement_unlocks (user_id, achievement_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, achievement_id, now_ms],
        )?;
        Ok(inserted > 0)
    }

    /// All unlocked achievement ids for a user, with unlock timestamps
    pub fn unlocks(&self, user_id: &str) -> Result<HashMap<String, i64>, ProgressionError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT achievement_id, unlocked_at FROM achievement_unlocks WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Try to claim a reward tier. Returns `false` if some caller already
    /// holds the claim - the compare-and-swap losers see that.
    pub fn claim_tier(
        &self,
        user_id: &str,
        tier_id: &str,
        bonus_coins: i64,
        now_ms: i64,
    ) -> Result<bool, ProgressionError> {
        let conn = self.db.conn();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO reward_tier_claims (user_id, tier_id, bonus_coins, claimed_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id, tier_id, bonus_coins, now_ms],
        )?;
        Ok(inserted > 0)
    }

    /// Tier ids this user has claimed
    pub fn claimed_tiers(&self, user_id: &str) -> Result<Vec<String>, ProgressionError> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare("SELECT tier_id FROM reward_tier_claims WHERE user_id = ?1")?;
        let rows = stmt.query_map([user_id], |row| row.get(0))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}
