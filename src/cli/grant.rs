//! Grant command implementation

use anyhow::{Result, bail};

use mentora::domain::XpSource;
use mentora::engine::GrantRequest;

use super::Context;

/// Grant XP for an activity, printing the resulting state and events
pub fn grant_command(ctx: &Context, user: &str, amount: i64, source: &str, key: &str) -> Result<()> {
    let Some(source) = XpSource::parse(source) else {
        let known: Vec<&str> = XpSource::all().iter().map(|s| s.as_str()).collect();
        bail!("unknown source '{}' (known: {})", source, known.join(", "));
    };

    let outcome = ctx.engine.grant_xp(&GrantRequest {
        user_id: user.to_string(),
        base_amount: amount,
        source,
        idempotency_key: key.to_string(),
    })?;

    if !outcome.accepted {
        println!("Duplicate event - nothing granted (key '{}' already seen).", key);
        return Ok(());
    }

    super::print_events(&outcome);
    println!(
        "\n{}: {} XP, level {} ({:.0}%), streak {} days",
        user,
        outcome.state.total_xp,
        outcome.state.level,
        outcome.state.level_progress * 100.0,
        outcome.state.streak_count,
    );
    Ok(())
}
