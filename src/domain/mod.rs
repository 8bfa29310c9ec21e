//! Core domain types for the Mentora progression engine

mod error;
mod event;
mod reward;
mod state;
mod transaction;

pub use error::ProgressionError;
pub use event::ProgressionEvent;
pub use reward::{Referral, ReferralStatus, Reward, RewardTier, TierStatus};
pub use state::{AggregateStats, ProgressionState, StreakSnapshot};
pub use transaction::{
    Currency, SubscriptionTier, XpSource, XpTransaction, achievement_reward_key, daily_login_key,
    tier_reward_key,
};
