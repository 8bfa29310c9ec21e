//! Claim command implementation

use anyhow::Result;

use mentora::ProgressionError;

use super::Context;

/// Claim a reward tier
pub fn claim_command(ctx: &Context, user: &str, tier: &str) -> Result<()> {
    match ctx.engine.claim_tier_reward(user, tier) {
        Ok(reward) => {
            println!("Claimed {}: +{} coins.", reward.tier_id, reward.bonus_coins);
            println!("Coin balance: {}", ctx.engine.coin_balance(user)?);
            Ok(())
        }
        Err(ProgressionError::AlreadyClaimed { tier_id }) => {
            println!("Tier {} was already claimed - nothing granted.", tier_id);
            Ok(())
        }
        Err(ProgressionError::NotEligible { needed, have, .. }) => {
            println!(
                "Not eligible yet: {} of {} completed referrals.",
                have, needed
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
