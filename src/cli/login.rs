//! Login command implementation

use anyhow::Result;

use super::Context;

/// Record the once-per-day login grant
pub fn login_command(ctx: &Context, user: &str) -> Result<()> {
    let outcome = ctx.engine.record_daily_login(user)?;

    if !outcome.accepted {
        println!("Already checked in today.");
        return Ok(());
    }

    super::print_events(&outcome);
    println!(
        "\nWelcome back! {} XP today, streak {} days.",
        outcome.state.today_xp, outcome.state.streak_count
    );
    Ok(())
}
