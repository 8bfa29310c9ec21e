//! Shared helpers for facade-level tests

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use mentora::ProgressionEngine;
use mentora::clock::FixedClock;
use mentora::config::ProgressionConfig;
use mentora::providers::{FixedProfile, StaticReferrals, StaticSubscriptions};
use mentora::store::ProgressionDb;

/// An engine over a temp database with a pinned clock and static providers
#[allow(dead_code)] // Not every test binary touches every provider
pub struct TestEnv {
    pub engine: ProgressionEngine,
    pub clock: Arc<FixedClock>,
    pub subscriptions: Arc<StaticSubscriptions>,
    pub referrals: Arc<StaticReferrals>,
    _dir: TempDir,
}

/// Engine with UTC users and the default config.
/// The clock starts at 2026-03-10 12:00 UTC.
pub fn test_env() -> TestEnv {
    test_env_with_offset(0)
}

#[allow(dead_code)]

/// Engine whose users live at the given UTC offset
pub fn test_env_with_offset(utc_offset_minutes: i32) -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = ProgressionDb::open(&dir.path().join("progression.db")).expect("open db");

    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap(),
    ));
    let subscriptions = Arc::new(StaticSubscriptions::default());
    let referrals = Arc::new(StaticReferrals::new());

    let engine = ProgressionEngine::new(
        db,
        ProgressionConfig::default(),
        clock.clone(),
        subscriptions.clone(),
        referrals.clone(),
        Arc::new(FixedProfile::new(utc_offset_minutes)),
    );

    TestEnv {
        engine,
        clock,
        subscriptions,
        referrals,
        _dir: dir,
    }
}
