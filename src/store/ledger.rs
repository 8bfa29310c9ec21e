//! Transaction ledger - the sole write path to XP and coin totals
//!
//! `append` is a single conditional insert keyed by
//! `(user_id, idempotency_key)` uniqueness: the insert either lands exactly
//! once or reports a duplicate, which is what lets concurrent devices
//! resubmit the same logical event safely. Totals are `SUM` queries over
//! the accepted rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use tracing::debug;

use super::db::ProgressionDb;
use crate::domain::{Currency, ProgressionError, XpSource, XpTransaction};

/// Outcome of a ledger append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendResult {
    /// The transaction was recorded
    Accepted,
    /// The idempotency key was already present for this user; nothing was
    /// written. Treated as success-no-op, not a failure.
    Duplicate,
}

/// Append and read interface over the `xp_transactions` table
#[derive(Clone)]
pub struct LedgerStore {
    db: ProgressionDb,
}

impl LedgerStore {
    pub fn new(db: ProgressionDb) -> Self {
        Self { db }
    }

    /// Append a transaction unless its idempotency key was already seen
    pub fn append(&self, txn: &XpTransaction) -> Result<AppendResult, ProgressionError> {
        let conn = self.db.conn();
        let inserted = conn.execute(
            r#"INSERT OR IGNORE INTO xp_transactions
               (id, user_id, base_amount, source, currency, tier_multiplier,
                streak_bonus, final_amount, idempotency_key, local_day, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            rusqlite::params![
                txn.id,
                txn.user_id,
                txn.base_amount,
                txn.source.as_str(),
                txn.currency.as_str(),
                txn.tier_multiplier,
                txn.streak_bonus,
                txn.final_amount,
                txn.idempotency_key,
                txn.local_day.format("%Y-%m-%d").to_string(),
                txn.created_at,
            ],
        )?;

        if inserted == 0 {
            debug!(
                user = %txn.user_id,
                key = %txn.idempotency_key,
                "duplicate grant rejected"
            );
            Ok(AppendResult::Duplicate)
        } else {
            Ok(AppendResult::Accepted)
        }
    }

    /// Total XP: sum of final amounts over accepted XP rows
    pub fn total_xp(&self, user_id: &str) -> Result<i64, ProgressionError> {
        let conn = self.db.conn();
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(final_amount), 0) FROM xp_transactions
             WHERE user_id = ?1 AND currency = 'xp'",
            [user_id],
            |r| r.get(0),
        )?;
        Ok(total)
    }

    /// Coin balance: sum of final amounts over accepted coin rows
    pub fn coin_balance(&self, user_id: &str) -> Result<i64, ProgressionError> {
        let conn = self.db.conn();
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(final_amount), 0) FROM xp_transactions
             WHERE user_id = ?1 AND currency = 'coins'",
            [user_id],
            |r| r.get(0),
        )?;
        Ok(total)
    }

    /// XP earned on one local calendar day
    pub fn xp_on_day(&self, user_id: &str, day: NaiveDate) -> Result<i64, ProgressionError> {
        let conn = self.db.conn();
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(final_amount), 0) FROM xp_transactions
             WHERE user_id = ?1 AND currency = 'xp' AND local_day = ?2",
            rusqlite::params![user_id, day.format("%Y-%m-%d").to_string()],
            |r| r.get(0),
        )?;
        Ok(total)
    }

    /// Per-source `(count, xp)` aggregates over accepted XP rows
    pub fn source_totals(
        &self,
        user_id: &str,
    ) -> Result<HashMap<XpSource, (u64, i64)>, ProgressionError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT source, COUNT(*), COALESCE(SUM(final_amount), 0) FROM xp_transactions
             WHERE user_id = ?1 AND currency = 'xp' GROUP BY source",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut totals = HashMap::new();
        for row in rows {
            let (tag, count, xp) = row?;
            if let Some(source) = XpSource::parse(&tag) {
                totals.insert(source, (count, xp));
            }
        }
        Ok(totals)
    }

    /// Most recent transactions for a user, newest first
    pub fn recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<XpTransaction>, ProgressionError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, base_amount, source, currency, tier_multiplier,
                    streak_bonus, final_amount, idempotency_key, local_day, created_at
             FROM xp_transactions WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![user_id, limit as i64], row_to_transaction)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Look up a transaction by its idempotency key
    pub fn by_key(
        &self,
        user_id: &str,
        idempotency_key: &str,
    ) -> Result<Option<XpTransaction>, ProgressionError> {
        let conn = self.db.conn();
        let txn = conn
            .query_row(
                "SELECT id, user_id, base_amount, source, currency, tier_multiplier,
                        streak_bonus, final_amount, idempotency_key, local_day, created_at
                 FROM xp_transactions WHERE user_id = ?1 AND idempotency_key = ?2",
                rusqlite::params![user_id, idempotency_key],
                row_to_transaction,
            )
            .optional()?;
        Ok(txn)
    }
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<XpTransaction> {
    let source_tag: String = row.get(3)?;
    let currency_tag: String = row.get(4)?;
    let day_tag: String = row.get(9)?;
    Ok(XpTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        base_amount: row.get(2)?,
        source: XpSource::parse(&source_tag)
            .ok_or_else(|| bad_column(3, format!("unknown source tag '{source_tag}'")))?,
        currency: Currency::parse(&currency_tag)
            .ok_or_else(|| bad_column(4, format!("unknown currency tag '{currency_tag}'")))?,
        tier_multiplier: row.get(5)?,
        streak_bonus: row.get(6)?,
        final_amount: row.get(7)?,
        idempotency_key: row.get(8)?,
        local_day: NaiveDate::parse_from_str(&day_tag, "%Y-%m-%d")
            .map_err(|e| bad_column(9, format!("bad local_day '{day_tag}': {e}")))?,
        created_at: row.get(10)?,
    })
}

fn bad_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProgressionDb;

    fn txn(user: &str, key: &str, amount: i64, source: XpSource) -> XpTransaction {
        XpTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            base_amount: amount,
            source,
            currency: Currency::Xp,
            tier_multiplier: 1.0,
            streak_bonus: 1.0,
            final_amount: amount,
            idempotency_key: key.to_string(),
            local_day: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            created_at: 1_770_000_000_000,
        }
    }

    #[test]
    fn test_duplicate_key_is_rejected_without_drift() {
        let db = ProgressionDb::open_in_memory().unwrap();
        let ledger = LedgerStore::new(db);

        let first = txn("u1", "chat:42", 10, XpSource::ChatCompletion);
        assert_eq!(ledger.append(&first).unwrap(), AppendResult::Accepted);

        // Same key, fresh transaction id - the retry a second device sends
        let mut retry = txn("u1", "chat:42", 10, XpSource::ChatCompletion);
        retry.id = uuid::Uuid::new_v4().to_string();
        assert_eq!(ledger.append(&retry).unwrap(), AppendResult::Duplicate);

        assert_eq!(ledger.total_xp("u1").unwrap(), 10);
    }

    #[test]
    fn test_same_key_different_users_both_accepted() {
        let db = ProgressionDb::open_in_memory().unwrap();
        let ledger = LedgerStore::new(db);

        assert_eq!(
            ledger
                .append(&txn("u1", "daily_login:2026-03-10", 10, XpSource::DailyLogin))
                .unwrap(),
            AppendResult::Accepted
        );
        assert_eq!(
            ledger
                .append(&txn("u2", "daily_login:2026-03-10", 10, XpSource::DailyLogin))
                .unwrap(),
            AppendResult::Accepted
        );
    }

    #[test]
    fn test_totals_are_per_currency() {
        let db = ProgressionDb::open_in_memory().unwrap();
        let ledger = LedgerStore::new(db);

        ledger.append(&txn("u1", "k1", 30, XpSource::LessonCompletion)).unwrap();

        let mut coins = txn("u1", "tier_reward:u1:referrals_5", 20, XpSource::TierReward);
        coins.currency = Currency::Coins;
        coins.final_amount = 20;
        ledger.append(&coins).unwrap();

        assert_eq!(ledger.total_xp("u1").unwrap(), 30);
        assert_eq!(ledger.coin_balance("u1").unwrap(), 20);
    }

    #[test]
    fn test_source_totals_group_counts_and_xp() {
        let db = ProgressionDb::open_in_memory().unwrap();
        let ledger = LedgerStore::new(db);

        ledger.append(&txn("u1", "g1", 15, XpSource::GameCompletion)).unwrap();
        ledger.append(&txn("u1", "g2", 15, XpSource::GameCompletion)).unwrap();
        ledger.append(&txn("u1", "c1", 5, XpSource::ChatCompletion)).unwrap();

        let totals = ledger.source_totals("u1").unwrap();
        assert_eq!(totals[&XpSource::GameCompletion], (2, 30));
        assert_eq!(totals[&XpSource::ChatCompletion], (1, 5));
    }
}
