//! Progress command implementation

use anyhow::Result;

use super::Context;

/// Show a user's progression state
pub fn progress_command(ctx: &Context, user: &str, json: bool) -> Result<()> {
    let state = ctx.engine.get_progress(user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("{} - level {} ({})", state.user_id, state.level, state.level_title);
    println!("  Total XP:  {}", state.total_xp);
    println!("  Progress:  {:.0}% to next level", state.level_progress * 100.0);
    println!("  Today:     {} XP", state.today_xp);
    println!(
        "  Streak:    {} days (best {})",
        state.streak_count, state.best_streak
    );

    if let Some(reset) = ctx.engine.streak_reset_time(user)? {
        println!("  Streak safe until {}", reset.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(())
}
