//! History command implementation

use anyhow::Result;
use chrono::DateTime;

use super::Context;

/// Show recent ledger entries, newest first
pub fn history_command(ctx: &Context, user: &str, limit: usize) -> Result<()> {
    let transactions = ctx.engine.history(user, limit)?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("Last {} transactions for {}:\n", transactions.len(), user);
    for txn in transactions {
        let when = DateTime::from_timestamp_millis(txn.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:>5} {} {} (base {} x{} x{})",
            when,
            txn.final_amount,
            txn.currency.as_str(),
            txn.source.as_str(),
            txn.base_amount,
            txn.tier_multiplier,
            txn.streak_bonus,
        );
    }

    Ok(())
}
