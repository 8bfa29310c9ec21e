use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "mentora")]
#[command(about = "Mentora progression engine - inspect and drive a progression database")]
#[command(version)]
struct Cli {
    /// Path to the progression database (defaults to ~/.mentora/progression.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.mentora/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subscription tier to resolve multipliers with (free, plus, pro, max, ultra)
    #[arg(long, global = true, default_value = "free")]
    tier: String,

    /// Completed referral count reported for the user
    #[arg(long, global = true, default_value_t = 0)]
    referrals: u32,

    /// User's UTC offset in minutes (local-day boundary for streaks)
    #[arg(long, global = true, default_value_t = 0)]
    utc_offset: i32,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant XP for an activity
    Grant {
        /// User to credit
        #[arg(long)]
        user: String,

        /// Base XP amount before multipliers
        #[arg(long)]
        amount: i64,

        /// Activity source tag (e.g. chat_completion, game_completion)
        #[arg(long)]
        source: String,

        /// Idempotency key for the triggering event
        #[arg(long)]
        key: String,
    },

    /// Record the once-per-day login grant
    Login {
        #[arg(long)]
        user: String,
    },

    /// Show a user's progression state
    Progress {
        #[arg(long)]
        user: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the achievement catalog with unlock state
    Achievements {
        #[arg(long)]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Show reward tiers, eligibility and coin balance
    Rewards {
        #[arg(long)]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Claim a reward tier
    Claim {
        #[arg(long)]
        user: String,

        /// Tier id (e.g. referrals_5)
        #[arg(long)]
        tier: String,
    },

    /// Show recent ledger entries
    History {
        #[arg(long)]
        user: String,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete all progression data for a user
    Reset {
        #[arg(long)]
        user: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let ctx = cli::Context::open(
        cli.db.as_deref(),
        cli.config.as_deref(),
        &cli.tier,
        cli.referrals,
        cli.utc_offset,
    )?;

    match cli.command {
        Commands::Grant {
            user,
            amount,
            source,
            key,
        } => cli::grant::grant_command(&ctx, &user, amount, &source, &key),
        Commands::Login { user } => cli::login::login_command(&ctx, &user),
        Commands::Progress { user, json } => cli::progress::progress_command(&ctx, &user, json),
        Commands::Achievements { user, json } => {
            cli::achievements::achievements_command(&ctx, &user, json)
        }
        Commands::Rewards { user, json } => cli::rewards::rewards_command(&ctx, &user, json),
        Commands::Claim { user, tier } => cli::claim::claim_command(&ctx, &user, &tier),
        Commands::History { user, limit } => cli::history::history_command(&ctx, &user, limit),
        Commands::Reset { user } => cli::reset::reset_command(&ctx, &user),
    }
}
