//! Multiplier resolution
//!
//! Tier and streak multipliers compose multiplicatively and round once, at
//! the end. The resolved numbers are stamped onto the transaction and never
//! re-derived, so a later tier change cannot rewrite history.

use crate::config::ProgressionConfig;
use crate::domain::SubscriptionTier;

/// A base amount with its multipliers applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAmount {
    pub tier_multiplier: f64,
    pub streak_bonus: f64,
    pub final_amount: i64,
}

/// Resolve the effective award for a base amount given the user's active
/// tier and current streak count
pub fn resolve(
    base_amount: i64,
    tier: SubscriptionTier,
    streak_count: u32,
    config: &ProgressionConfig,
) -> ResolvedAmount {
    let tier_multiplier = config.multipliers.for_tier(tier);
    let streak_bonus = config.streak.bonus_for(streak_count);
    compose(base_amount, tier_multiplier, streak_bonus)
}

/// `round(base * tier * streak)` with a single terminal rounding
pub fn compose(base_amount: i64, tier_multiplier: f64, streak_bonus: f64) -> ResolvedAmount {
    let final_amount = (base_amount as f64 * tier_multiplier * streak_bonus).round() as i64;
    ResolvedAmount {
        tier_multiplier,
        streak_bonus,
        final_amount,
    }
}
