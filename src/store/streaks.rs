//! Streak row persistence (one row per user)

use chrono::NaiveDate;
use rusqlite::OptionalExtension;

use super::db::ProgressionDb;
use crate::domain::{ProgressionError, StreakSnapshot};

/// Load/save interface over the `streaks` table
#[derive(Clone)]
pub struct StreakStore {
    db: ProgressionDb,
}

impl StreakStore {
    pub fn new(db: ProgressionDb) -> Self {
        Self { db }
    }

    /// Load a user's streak state; a user with no row has the default
    /// (no streak yet)
    pub fn load(&self, user_id: &str) -> Result<StreakSnapshot, ProgressionError> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                "SELECT current_count, best_count, last_active_day FROM streaks WHERE user_id = ?1",
                [user_id],
                |r| {
                    Ok((
                        r.get::<_, u32>(0)?,
                        r.get::<_, u32>(1)?,
                        r.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(match row {
            Some((current, best, last_day)) => StreakSnapshot {
                current,
                best,
                last_active_day: last_day
                    .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            },
            None => StreakSnapshot::default(),
        })
    }

    /// Upsert a user's streak state
    pub fn save(
        &self,
        user_id: &str,
        snapshot: &StreakSnapshot,
        now_ms: i64,
    ) -> Result<(), ProgressionError> {
        let last_day = snapshot
            .last_active_day
            .map(|d| d.format("%Y-%m-%d").to_string());

        let conn = self.db.conn();
        conn.execute(
            r#"
            INSERT INTO streaks (user_id, current_count, best_count, last_active_day, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                current_count = ?2, best_count = ?3, last_active_day = ?4, updated_at = ?5
            "#,
            rusqlite::params![user_id, snapshot.current, snapshot.best, last_day, now_ms],
        )?;
        Ok(())
    }
}
