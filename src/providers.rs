//! Inbound dependency seams
//!
//! The engine consumes three external collaborators: the subscription
//! service (active tier), the referral service (completed counts) and the
//! user profile service (timezone offset). Each is a narrow trait so the
//! application wires its real backends in while tests and the CLI use the
//! static implementations below.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{ProgressionError, SubscriptionTier};

/// Supplies the user's active subscription tier
pub trait SubscriptionProvider: Send + Sync {
    fn active_tier(&self, user_id: &str) -> Result<SubscriptionTier, ProgressionError>;
}

/// Supplies the user's completed-referral count
pub trait ReferralProvider: Send + Sync {
    fn completed_referrals(&self, user_id: &str) -> Result<u32, ProgressionError>;
}

/// Supplies per-user profile data the engine needs: the UTC offset that
/// defines the user's local day boundary
pub trait UserProfileProvider: Send + Sync {
    fn utc_offset_minutes(&self, user_id: &str) -> Result<i32, ProgressionError>;
}

/// In-memory subscription lookup with a default tier and per-user overrides
#[derive(Debug, Default)]
pub struct StaticSubscriptions {
    default_tier: SubscriptionTier,
    overrides: Mutex<HashMap<String, SubscriptionTier>>,
}

impl StaticSubscriptions {
    pub fn new(default_tier: SubscriptionTier) -> Self {
        Self {
            default_tier,
            overrides: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_tier(&self, user_id: &str, tier: SubscriptionTier) {
        self.overrides
            .lock()
            .expect("subscriptions lock")
            .insert(user_id.to_string(), tier);
    }
}

impl SubscriptionProvider for StaticSubscriptions {
    fn active_tier(&self, user_id: &str) -> Result<SubscriptionTier, ProgressionError> {
        Ok(self
            .overrides
            .lock()
            .expect("subscriptions lock")
            .get(user_id)
            .copied()
            .unwrap_or(self.default_tier))
    }
}

/// In-memory referral counts with a default for unlisted users
#[derive(Debug, Default)]
pub struct StaticReferrals {
    default_count: u32,
    counts: Mutex<HashMap<String, u32>>,
}

impl StaticReferrals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `count` for every user without an explicit entry
    pub fn with_default(default_count: u32) -> Self {
        Self {
            default_count,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_completed(&self, user_id: &str, count: u32) {
        self.counts
            .lock()
            .expect("referrals lock")
            .insert(user_id.to_string(), count);
    }
}

impl ReferralProvider for StaticReferrals {
    fn completed_referrals(&self, user_id: &str) -> Result<u32, ProgressionError> {
        Ok(self
            .counts
            .lock()
            .expect("referrals lock")
            .get(user_id)
            .copied()
            .unwrap_or(self.default_count))
    }
}

/// Profile provider that reports the same UTC offset for every user
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedProfile {
    pub utc_offset_minutes: i32,
}

impl FixedProfile {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }
}

impl UserProfileProvider for FixedProfile {
    fn utc_offset_minutes(&self, _user_id: &str) -> Result<i32, ProgressionError> {
        Ok(self.utc_offset_minutes)
    }
}
