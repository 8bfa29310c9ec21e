//! Mentora progression engine
//!
//! The progression and rewards core of the Mentora learning app: an
//! append-only XP ledger with derived levels, daily streaks, multiplier
//! composition, achievement unlocks and one-shot reward tier claims.
//!
//! ## Design
//!
//! Everything a screen displays is *derived*: totals are sums over the
//! ledger, levels are a pure function of total XP, and duplicate grants are
//! rejected by idempotency keys rather than client-side booleans. The only
//! write path to any total is [`engine::ProgressionEngine::grant_xp`].
//!
//! ```ignore
//! let engine = ProgressionEngine::new(db, config, clock, subs, refs, profile);
//!
//! let outcome = engine.grant_xp(&GrantRequest {
//!     user_id: "u1".into(),
//!     base_amount: 10,
//!     source: XpSource::ChatCompletion,
//!     idempotency_key: "chat_completion:conv-42".into(),
//! })?;
//!
//! for event in &outcome.events {
//!     // celebrate: level ups, streaks, achievement unlocks
//! }
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod providers;
pub mod store;

pub use domain::*;
pub use engine::{GrantOutcome, GrantRequest, ProgressionEngine};
