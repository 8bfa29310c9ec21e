//! SQLite persistence for the progression engine
//!
//! Four tables carry all durable state:
//!
//! - `xp_transactions` — the append-only ledger, unique on
//!   `(user_id, idempotency_key)`
//! - `streaks` — one row per user, only written by the streak transition
//! - `achievement_unlocks` — unique on `(user_id, achievement_id)`
//! - `reward_tier_claims` — unique on `(user_id, tier_id)`
//!
//! There is deliberately no snapshot row for `ProgressionState`: totals,
//! levels and today-XP are derived by summing the ledger on read, so no
//! stored counter can drift from the transaction history.

mod db;
mod ledger;
mod rewards;
mod streaks;

pub use db::ProgressionDb;
pub use ledger::{AppendResult, LedgerStore};
pub use rewards::RewardStore;
pub use streaks::StreakStore;
