use serde::{Deserialize, Serialize};

/// State of a single referral, as reported by the referral service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Completed,
}

/// One referral as reported by the referral service.
///
/// The engine never stores these; only the completed count feeds tier
/// eligibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referral {
    pub referrer_id: String,
    pub referred_id: String,
    pub status: ReferralStatus,
    pub coins_earned: i64,
    /// Milliseconds since epoch, set when the referral completed
    pub completed_at: Option<i64>,
}

/// A claimable referral milestone.
///
/// Tiers are configuration (see `ProgressionConfig::reward_tiers`); the
/// per-user claimed flag lives in the `reward_tier_claims` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTier {
    /// Stable id used in claim keys, e.g. `referrals_5`
    pub id: String,
    /// Completed referrals required to claim
    pub threshold: u32,
    pub bonus_coins: i64,
}

/// The result of a successful tier claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub tier_id: String,
    pub bonus_coins: i64,
    /// Milliseconds since epoch
    pub claimed_at: i64,
}

/// Per-tier view for the rewards screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStatus {
    pub tier: RewardTier,
    pub eligible: bool,
    pub claimed: bool,
}
