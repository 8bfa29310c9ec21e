use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What triggered an XP grant.
///
/// The source is part of the transaction's identity: idempotency keys are
/// derived from the source plus the causal event, so two devices reporting
/// the same logical event collapse into one accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    DailyLogin,
    ChatCompletion,
    ChallengeCompletion,
    GameCompletion,
    LessonCompletion,
    Bookmark,
    Reaction,
    QuoteShare,
    /// Credit attached to an achievement unlock
    AchievementReward,
    /// Coin credit attached to a reward tier claim
    TierReward,
}

impl XpSource {
    /// Get the string tag for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyLogin => "daily_login",
            Self::ChatCompletion => "chat_completion",
            Self::ChallengeCompletion => "challenge_completion",
            Self::GameCompletion => "game_completion",
            Self::LessonCompletion => "lesson_completion",
            Self::Bookmark => "bookmark",
            Self::Reaction => "reaction",
            Self::QuoteShare => "quote_share",
            Self::AchievementReward => "achievement_reward",
            Self::TierReward => "tier_reward",
        }
    }

    /// Parse from a database tag
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily_login" => Some(Self::DailyLogin),
            "chat_completion" => Some(Self::ChatCompletion),
            "challenge_completion" => Some(Self::ChallengeCompletion),
            "game_completion" => Some(Self::GameCompletion),
            "lesson_completion" => Some(Self::LessonCompletion),
            "bookmark" => Some(Self::Bookmark),
            "reaction" => Some(Self::Reaction),
            "quote_share" => Some(Self::QuoteShare),
            "achievement_reward" => Some(Self::AchievementReward),
            "tier_reward" => Some(Self::TierReward),
            _ => None,
        }
    }

    /// All sources, in display order
    pub fn all() -> &'static [XpSource] {
        &[
            Self::DailyLogin,
            Self::ChatCompletion,
            Self::ChallengeCompletion,
            Self::GameCompletion,
            Self::LessonCompletion,
            Self::Bookmark,
            Self::Reaction,
            Self::QuoteShare,
            Self::AchievementReward,
            Self::TierReward,
        ]
    }
}

/// Currency of a ledger credit.
///
/// XP drives levels and streak bonuses; coins are the referral-reward
/// currency. Both share the append-only ledger so both inherit its
/// idempotency guarantees, but totals are summed per currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Xp,
    Coins,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xp => "xp",
            Self::Coins => "coins",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "xp" => Some(Self::Xp),
            "coins" => Some(Self::Coins),
            _ => None,
        }
    }
}

/// Active subscription plan, supplied by the subscription service.
///
/// Each tier maps to an XP multiplier in `MultiplierConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Plus,
    Pro,
    Max,
    Ultra,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Plus => "plus",
            Self::Pro => "pro",
            Self::Max => "max",
            Self::Ultra => "ultra",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "plus" => Some(Self::Plus),
            "pro" => Some(Self::Pro),
            "max" => Some(Self::Max),
            "ultra" => Some(Self::Ultra),
            _ => None,
        }
    }
}

/// One accepted XP-granting event.
///
/// Transactions are immutable once written; `total_xp` is always the sum of
/// `final_amount` over a user's accepted rows, never a stored counter. The
/// multipliers captured here are the ones that applied at award time and are
/// never re-derived, so later tier changes do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpTransaction {
    /// Unique transaction id (UUID v4)
    pub id: String,
    pub user_id: String,
    pub base_amount: i64,
    pub source: XpSource,
    pub currency: Currency,
    pub tier_multiplier: f64,
    pub streak_bonus: f64,
    /// `round(base_amount * tier_multiplier * streak_bonus)`, rounded once
    pub final_amount: i64,
    /// Deterministic per (user, source, causal event); duplicates are rejected
    pub idempotency_key: String,
    /// The user's local calendar day when the grant was made
    pub local_day: NaiveDate,
    /// Milliseconds since epoch
    pub created_at: i64,
}

/// Idempotency key for the once-per-local-day login grant.
///
/// Derived server-side from the user's local day so that two devices
/// checking in on the same day collapse on the ledger's uniqueness
/// constraint.
pub fn daily_login_key(user_id: &str, local_day: NaiveDate) -> String {
    format!("daily_login:{}:{}", user_id, local_day.format("%Y-%m-%d"))
}

/// Idempotency key for the XP credited by an achievement unlock
pub fn achievement_reward_key(user_id: &str, achievement_id: &str) -> String {
    format!("achievement:{}:{}", user_id, achievement_id)
}

/// Idempotency key for the coin credit of a reward tier claim
pub fn tier_reward_key(user_id: &str, tier_id: &str) -> String {
    format!("tier_reward:{}:{}", user_id, tier_id)
}
