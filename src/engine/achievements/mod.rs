//! Achievement catalog and evaluation
//!
//! Unlock conditions are declarative `UnlockRule` data on the catalog
//! entries, evaluated in one place against derived aggregates. The unlock
//! uniqueness invariant lives in the `achievement_unlocks` table, not in
//! client-side booleans.

mod definitions;
mod evaluator;

pub use definitions::{
    ACHIEVEMENTS, Achievement, AchievementCategory, AchievementId, UnlockRule,
};
pub use evaluator::{AchievementStatus, evaluate};
