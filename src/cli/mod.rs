//! CLI command implementations

pub mod achievements;
pub mod claim;
pub mod grant;
pub mod history;
pub mod login;
pub mod progress;
pub mod reset;
pub mod rewards;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};

use mentora::clock::SystemClock;
use mentora::config::ProgressionConfig;
use mentora::domain::SubscriptionTier;
use mentora::providers::{FixedProfile, StaticReferrals, StaticSubscriptions};
use mentora::store::ProgressionDb;
use mentora::{GrantOutcome, ProgressionEngine};

/// Shared command context: the engine plus the db handle for admin ops.
///
/// The subscription tier, referral count and UTC offset come from CLI
/// flags - in the application they come from the real services.
pub struct Context {
    pub engine: ProgressionEngine,
    pub db: ProgressionDb,
}

impl Context {
    pub fn open(
        db_path: Option<&Path>,
        config_path: Option<&Path>,
        tier: &str,
        referrals: u32,
        utc_offset_minutes: i32,
    ) -> Result<Self> {
        let Some(tier) = SubscriptionTier::parse(tier) else {
            bail!("unknown subscription tier: {tier}");
        };

        let config = match config_path {
            Some(path) => ProgressionConfig::load(path)?,
            None => ProgressionConfig::load(&ProgressionConfig::default_path())?,
        };

        let db = match db_path {
            Some(path) => ProgressionDb::open(path)?,
            None => ProgressionDb::open_default()?,
        };

        let subscriptions = Arc::new(StaticSubscriptions::new(tier));
        // The flag applies to whichever user the command targets
        let referral_provider = Arc::new(StaticReferrals::with_default(referrals));

        let engine = ProgressionEngine::new(
            db.clone(),
            config,
            Arc::new(SystemClock),
            subscriptions,
            referral_provider,
            Arc::new(FixedProfile::new(utc_offset_minutes)),
        );

        Ok(Self { engine, db })
    }
}

/// Print the celebration events of a grant outcome
pub fn print_events(outcome: &GrantOutcome) {
    use mentora::ProgressionEvent;

    for event in &outcome.events {
        match event {
            ProgressionEvent::XpAwarded { amount, source } => {
                println!("  +{} XP ({})", amount, source.as_str());
            }
            ProgressionEvent::StreakExtended { count } => {
                println!("  Streak extended to {} days", count);
            }
            ProgressionEvent::LevelUp {
                new_level,
                new_title,
                ..
            } => {
                println!("  Level up! Now level {} ({})", new_level, new_title);
            }
            ProgressionEvent::AchievementUnlocked {
                name, xp_reward, ..
            } => {
                println!("  Achievement unlocked: {} (+{} XP)", name, xp_reward);
            }
        }
    }
}
