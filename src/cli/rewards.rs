//! Rewards command implementation

use anyhow::Result;
use serde_json::json;

use super::Context;

/// Show reward tiers, eligibility and coin balance
pub fn rewards_command(ctx: &Context, user: &str, json: bool) -> Result<()> {
    let tiers = ctx.engine.reward_tiers(user)?;
    let coins = ctx.engine.coin_balance(user)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "coin_balance": coins,
                "tiers": tiers,
            }))?
        );
        return Ok(());
    }

    println!("Coin balance: {}\n", coins);
    for status in tiers {
        let state = if status.claimed {
            "claimed"
        } else if status.eligible {
            "claimable"
        } else {
            "locked"
        };
        println!(
            "  {} - {} referrals, {} coins [{}]",
            status.tier.id, status.tier.threshold, status.tier.bonus_coins, state
        );
    }

    Ok(())
}
