//! Database connection and schema management
//!
//! Manages the `~/.mentora/progression.db` database with automatic schema
//! migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config;

/// Database wrapper shared by the ledger, streak and reward stores
#[derive(Clone)]
pub struct ProgressionDb {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl ProgressionDb {
    /// Open or create the database at the default location
    /// (~/.mentora/progression.db)
    pub fn open_default() -> Result<Self> {
        let db_path = config::data_dir().join("progression.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progression db: {}", path.display()))?;

        // WAL so concurrent callers (multiple devices syncing through one
        // backend process) don't block readers
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Progression DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: v1 ledgers predate the coin currency; every existing
        // row was an XP credit
        if version < 2 {
            let has_currency: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('xp_transactions') WHERE name = 'currency'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_currency {
                conn.execute_batch(
                    "ALTER TABLE xp_transactions ADD COLUMN currency TEXT NOT NULL DEFAULT 'xp';",
                )?;
            }

            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete all progression data for one user
    pub fn reset_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM xp_transactions WHERE user_id = ?1", [user_id])?;
        conn.execute("DELETE FROM streaks WHERE user_id = ?1", [user_id])?;
        conn.execute("DELETE FROM achievement_unlocks WHERE user_id = ?1", [user_id])?;
        conn.execute("DELETE FROM reward_tier_claims WHERE user_id = ?1", [user_id])?;
        Ok(())
    }

    /// Delete all progression data (every user)
    pub fn reset_all(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            DELETE FROM xp_transactions;
            DELETE FROM streaks;
            DELETE FROM achievement_unlocks;
            DELETE FROM reward_tier_claims;
            "#,
        )?;
        Ok(())
    }
}

/// SQL schema for the progression database
const SCHEMA_SQL: &str = r#"
-- Append-only XP/coin ledger (one row per accepted grant)
CREATE TABLE IF NOT EXISTS xp_transactions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    base_amount INTEGER NOT NULL,
    source TEXT NOT NULL,
    currency TEXT NOT NULL DEFAULT 'xp',
    tier_multiplier REAL NOT NULL DEFAULT 1.0,
    streak_bonus REAL NOT NULL DEFAULT 1.0,
    final_amount INTEGER NOT NULL,
    idempotency_key TEXT NOT NULL,
    local_day TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE(user_id, idempotency_key)
);
CREATE INDEX IF NOT EXISTS idx_txn_user ON xp_transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_txn_user_day ON xp_transactions(user_id, local_day);
CREATE INDEX IF NOT EXISTS idx_txn_user_source ON xp_transactions(user_id, source);

-- Daily streak state (one row per user)
CREATE TABLE IF NOT EXISTS streaks (
    user_id TEXT PRIMARY KEY,
    current_count INTEGER NOT NULL DEFAULT 0,
    best_count INTEGER NOT NULL DEFAULT 0,
    last_active_day TEXT,
    updated_at INTEGER
);

-- Unlocked achievements (at most one row per user+achievement)
CREATE TABLE IF NOT EXISTS achievement_unlocks (
    user_id TEXT NOT NULL,
    achievement_id TEXT NOT NULL,
    unlocked_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);

-- One-shot reward tier claims (at most one row per user+tier)
CREATE TABLE IF NOT EXISTS reward_tier_claims (
    user_id TEXT NOT NULL,
    tier_id TEXT NOT NULL,
    bonus_coins INTEGER NOT NULL,
    claimed_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, tier_id)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (2);
"#;
