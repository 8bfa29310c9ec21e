//! Achievements command implementation

use anyhow::Result;

use super::Context;

/// Show the achievement catalog with unlock state
pub fn achievements_command(ctx: &Context, user: &str, json: bool) -> Result<()> {
    let statuses = ctx.engine.achievements(user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    let unlocked = statuses.iter().filter(|s| s.unlocked).count();
    println!("Achievements ({}/{} unlocked):\n", unlocked, statuses.len());

    for status in statuses {
        let marker = if status.unlocked { "x" } else { " " };
        println!(
            "  [{}] {} {} - {} (+{} XP)",
            marker, status.icon, status.name, status.description, status.xp_reward
        );
    }

    Ok(())
}
