//! Reset command implementation

use anyhow::Result;

use super::Context;

/// Delete all progression data for a user
pub fn reset_command(ctx: &Context, user: &str) -> Result<()> {
    ctx.db.reset_user(user)?;
    println!("Progression data for {} deleted.", user);
    Ok(())
}
