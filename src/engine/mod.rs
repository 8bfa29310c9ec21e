//! Progression engine facade
//!
//! `ProgressionEngine` is the single entry point the rest of the
//! application calls to grant XP, query state and claim rewards. Every
//! grant flows one way: resolve multipliers -> append to the ledger ->
//! advance the streak -> re-evaluate achievements -> return the derived
//! state plus celebration events.

pub mod achievements;
pub mod level;
pub mod multiplier;
mod rewards;
pub mod streak;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{self, Clock};
use crate::config::ProgressionConfig;
use crate::domain::{
    AggregateStats, Currency, ProgressionError, ProgressionEvent, ProgressionState,
    XpSource, XpTransaction, achievement_reward_key, daily_login_key,
};
use crate::providers::{ReferralProvider, SubscriptionProvider, UserProfileProvider};
use crate::store::{AppendResult, LedgerStore, ProgressionDb, RewardStore, StreakStore};

pub use achievements::AchievementStatus;
pub use level::LevelInfo;
pub use multiplier::ResolvedAmount;

/// One XP grant, as submitted by a caller.
///
/// The idempotency key must be deterministic from the triggering event
/// (e.g. `chat_completion:{conversation_id}`), never from wall-clock time
/// at the call site, so that near-simultaneous submissions of the same
/// logical event collapse into one accepted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRequest {
    pub user_id: String,
    pub base_amount: i64,
    pub source: XpSource,
    pub idempotency_key: String,
}

/// Result of a grant: the fresh state plus fire-and-forget celebration
/// events. `accepted == false` means the idempotency key was already seen
/// and nothing changed - a success-no-op, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantOutcome {
    pub state: ProgressionState,
    pub accepted: bool,
    pub events: Vec<ProgressionEvent>,
}

/// The progression facade. Cheap to clone; all clones share one database.
#[derive(Clone)]
pub struct ProgressionEngine {
    ledger: LedgerStore,
    streaks: StreakStore,
    rewards: RewardStore,
    config: Arc<ProgressionConfig>,
    clock: Arc<dyn Clock>,
    subscriptions: Arc<dyn SubscriptionProvider>,
    referrals: Arc<dyn ReferralProvider>,
    profiles: Arc<dyn UserProfileProvider>,
}

impl ProgressionEngine {
    pub fn new(
        db: ProgressionDb,
        config: ProgressionConfig,
        clock: Arc<dyn Clock>,
        subscriptions: Arc<dyn SubscriptionProvider>,
        referrals: Arc<dyn ReferralProvider>,
        profiles: Arc<dyn UserProfileProvider>,
    ) -> Self {
        Self {
            ledger: LedgerStore::new(db.clone()),
            streaks: StreakStore::new(db.clone()),
            rewards: RewardStore::new(db),
            config: Arc::new(config),
            clock,
            subscriptions,
            referrals,
            profiles,
        }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    // ========================================
    // GRANTS
    // ========================================

    /// Grant XP for a qualifying activity.
    ///
    /// At-most-once per idempotency key: a duplicate submission returns the
    /// current state unchanged with `accepted == false`.
    pub fn grant_xp(&self, request: &GrantRequest) -> Result<GrantOutcome, ProgressionError> {
        if request.user_id.is_empty() {
            return Err(ProgressionError::InvalidGrant("empty user id".into()));
        }
        if request.idempotency_key.is_empty() {
            return Err(ProgressionError::InvalidGrant("empty idempotency key".into()));
        }
        if request.base_amount < 0 {
            return Err(ProgressionError::InvalidGrant(format!(
                "negative base amount {}",
                request.base_amount
            )));
        }

        let user_id = request.user_id.as_str();
        let now = self.clock.now_utc();
        let now_ms = now.timestamp_millis();
        let offset = self.profiles.utc_offset_minutes(user_id)?;
        let today = clock::local_day(now, offset);

        let total_before = self.ledger.total_xp(user_id)?;
        let level_before = level::level_of(total_before, &self.config.levels);

        // Tentative streak transition; only persisted if the grant is
        // accepted, so a replayed event cannot move the streak
        let prev_streak = self.streaks.load(user_id)?;
        let transition = streak::advance(&prev_streak, today);

        let tier = self.subscriptions.active_tier(user_id)?;
        let resolved = multiplier::resolve(
            request.base_amount,
            tier,
            transition.snapshot.current,
            &self.config,
        );

        let txn = XpTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            base_amount: request.base_amount,
            source: request.source,
            currency: Currency::Xp,
            tier_multiplier: resolved.tier_multiplier,
            streak_bonus: resolved.streak_bonus,
            final_amount: resolved.final_amount,
            idempotency_key: request.idempotency_key.clone(),
            local_day: today,
            created_at: now_ms,
        };

        if self.ledger.append(&txn)? == AppendResult::Duplicate {
            debug!(user = user_id, key = %request.idempotency_key, "grant ignored: duplicate event");
            return Ok(GrantOutcome {
                state: self.get_progress(user_id)?,
                accepted: false,
                events: Vec::new(),
            });
        }

        let mut events = vec![ProgressionEvent::XpAwarded {
            amount: resolved.final_amount,
            source: request.source,
        }];

        if transition.changed {
            self.streaks.save(user_id, &transition.snapshot, now_ms)?;
            if transition.extended {
                events.push(ProgressionEvent::StreakExtended {
                    count: transition.snapshot.current,
                });
            }
        }

        info!(
            user = user_id,
            source = request.source.as_str(),
            base = request.base_amount,
            awarded = resolved.final_amount,
            streak = transition.snapshot.current,
            "xp granted"
        );

        // Achievements see the post-grant aggregates
        events.extend(self.unlock_newly_earned(user_id, today, now_ms)?);

        let state = self.get_progress(user_id)?;
        if state.level > level_before.level {
            info!(user = user_id, from = level_before.level, to = state.level, "level up");
            events.push(ProgressionEvent::LevelUp {
                old_level: level_before.level,
                new_level: state.level,
                new_title: state.level_title.clone(),
            });
        }

        Ok(GrantOutcome {
            state,
            accepted: true,
            events,
        })
    }

    /// Record the once-per-day login grant.
    ///
    /// The idempotency key is derived here, server-side, from the user's
    /// local day - two devices checking in on the same day collapse into
    /// one accepted grant.
    pub fn record_daily_login(&self, user_id: &str) -> Result<GrantOutcome, ProgressionError> {
        let offset = self.profiles.utc_offset_minutes(user_id)?;
        let today = clock::local_day(self.clock.now_utc(), offset);
        self.grant_xp(&GrantRequest {
            user_id: user_id.to_string(),
            base_amount: self.config.daily_login_xp,
            source: XpSource::DailyLogin,
            idempotency_key: daily_login_key(user_id, today),
        })
    }

    // ========================================
    // QUERIES
    // ========================================

    /// Assemble the user's current progression state from the ledger and
    /// streak row
    pub fn get_progress(&self, user_id: &str) -> Result<ProgressionState, ProgressionError> {
        let offset = self.profiles.utc_offset_minutes(user_id)?;
        let today = clock::local_day(self.clock.now_utc(), offset);

        let total_xp = self.ledger.total_xp(user_id)?;
        let level_info = level::level_of(total_xp, &self.config.levels);
        let streak = self.streaks.load(user_id)?;

        Ok(ProgressionState {
            user_id: user_id.to_string(),
            total_xp,
            level: level_info.level,
            level_progress: level_info.progress,
            level_title: level_info.title,
            streak_count: streak::effective_count(&streak, today),
            best_streak: streak.best,
            last_active_day: streak.last_active_day,
            today_xp: self.ledger.xp_on_day(user_id, today)?,
        })
    }

    /// When the current streak lapses if no further activity happens.
    /// `None` when there is no live streak. Advisory for UI countdowns.
    pub fn streak_reset_time(
        &self,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, ProgressionError> {
        let offset = self.profiles.utc_offset_minutes(user_id)?;
        let today = clock::local_day(self.clock.now_utc(), offset);
        let snapshot = self.streaks.load(user_id)?;
        Ok(streak::reset_time(&snapshot, today, offset))
    }

    /// Recent ledger entries, newest first
    pub fn history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<XpTransaction>, ProgressionError> {
        self.ledger.recent(user_id, limit)
    }

    // ========================================
    // ACHIEVEMENTS
    // ========================================

    /// Full catalog annotated with the user's unlock state
    pub fn achievements(
        &self,
        user_id: &str,
    ) -> Result<Vec<AchievementStatus>, ProgressionError> {
        let unlocks = self.rewards.unlocks(user_id)?;
        Ok(achievements::ACHIEVEMENTS
            .iter()
            .map(|a| {
                AchievementStatus::from_definition(a, unlocks.get(a.id.as_str()).copied())
            })
            .collect())
    }

    /// Unlock a specific achievement directly (no-op if already unlocked).
    ///
    /// The unlock XP is credited through the ledger with a deterministic
    /// key, so even a replay cannot double-credit.
    pub fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
    ) -> Result<Option<AchievementStatus>, ProgressionError> {
        let Some(achievement) = achievements::Achievement::by_tag(achievement_id) else {
            return Err(ProgressionError::UnknownAchievement {
                achievement_id: achievement_id.to_string(),
            });
        };

        let now = self.clock.now_utc();
        let now_ms = now.timestamp_millis();
        let offset = self.profiles.utc_offset_minutes(user_id)?;
        let today = clock::local_day(now, offset);

        self.credit_achievement(user_id, achievement, today, now_ms)?;
        if !self.rewards.insert_unlock(user_id, achievement_id, now_ms)? {
            return Ok(None);
        }

        info!(user = user_id, achievement = achievement_id, "achievement unlocked");
        Ok(Some(AchievementStatus::from_definition(
            achievement,
            Some(now_ms),
        )))
    }

    /// Evaluate all not-yet-unlocked achievements and persist any newly
    /// earned ones. Returns one event per fresh unlock.
    fn unlock_newly_earned(
        &self,
        user_id: &str,
        today: NaiveDate,
        now_ms: i64,
    ) -> Result<Vec<ProgressionEvent>, ProgressionError> {
        let stats = self.aggregate_stats(user_id, today)?;
        let unlocked: HashSet<String> =
            self.rewards.unlocks(user_id)?.into_keys().collect();

        let mut events = Vec::new();
        for achievement in achievements::evaluate(&stats, &unlocked) {
            // Credit before recording the unlock: if we lose the race (or
            // crash between the two writes) the ledger key keeps the credit
            // exactly-once and the next evaluation repairs the unlock row
            self.credit_achievement(user_id, achievement, today, now_ms)?;
            if self.rewards.insert_unlock(user_id, achievement.id.as_str(), now_ms)? {
                info!(
                    user = user_id,
                    achievement = achievement.id.as_str(),
                    "achievement unlocked"
                );
                events.push(ProgressionEvent::AchievementUnlocked {
                    achievement_id: achievement.id.as_str().to_string(),
                    name: achievement.name.to_string(),
                    xp_reward: achievement.xp_reward,
                });
            }
        }
        Ok(events)
    }

    /// Append the unlock XP for an achievement. Duplicate-safe via the
    /// deterministic ledger key; unlock rewards carry no multipliers.
    fn credit_achievement(
        &self,
        user_id: &str,
        achievement: &achievements::Achievement,
        today: NaiveDate,
        now_ms: i64,
    ) -> Result<(), ProgressionError> {
        let txn = XpTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            base_amount: achievement.xp_reward,
            source: XpSource::AchievementReward,
            currency: Currency::Xp,
            tier_multiplier: 1.0,
            streak_bonus: 1.0,
            final_amount: achievement.xp_reward,
            idempotency_key: achievement_reward_key(user_id, achievement.id.as_str()),
            local_day: today,
            created_at: now_ms,
        };
        self.ledger.append(&txn)?;
        Ok(())
    }

    /// Aggregates the achievement rules are checked against
    fn aggregate_stats(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<AggregateStats, ProgressionError> {
        let total_xp = self.ledger.total_xp(user_id)?;
        let streak = self.streaks.load(user_id)?;
        Ok(AggregateStats {
            total_xp,
            level: level::level_of(total_xp, &self.config.levels).level,
            streak_count: streak::effective_count(&streak, today),
            best_streak: streak.best,
            source_totals: self.ledger.source_totals(user_id)?,
            completed_referrals: self.referrals.completed_referrals(user_id)?,
        })
    }
}
