/// Error type for progression operations.
///
/// Only `Storage` and `Provider` are transient failures worth retrying;
/// the rest are expected, non-exceptional outcomes. A duplicate grant is not
/// an error at all — it is reported as `GrantOutcome { accepted: false }` —
/// and an already-unlocked achievement comes back as `None` from
/// `unlock_achievement`. The engine never retries internally: callers own
/// retry/backoff, since callers also own the idempotency key and can safely
/// resend.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("not eligible for tier '{tier_id}': requires {needed} completed referrals, have {have}")]
    NotEligible {
        tier_id: String,
        needed: u32,
        have: u32,
    },

    #[error("reward tier '{tier_id}' was already claimed")]
    AlreadyClaimed { tier_id: String },

    #[error("unknown reward tier '{tier_id}'")]
    UnknownTier { tier_id: String },

    #[error("unknown achievement '{achievement_id}'")]
    UnknownAchievement { achievement_id: String },

    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    #[error("provider failure: {0}")]
    Provider(String),

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}
