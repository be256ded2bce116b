//! Per-email submission cooldown
//!
//! One accepted submission per normalized email per 7 days. The store is
//! injected behind a trait so the endpoint logic is testable without real
//! concurrency and swappable between the in-memory reference behavior and
//! the durable SQLite backend.

use async_trait::async_trait;
use monpro_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Mutex;

/// 7-day minimum interval between submissions from one email
pub const COOLDOWN_PERIOD_MS: i64 = 7 * 24 * 60 * 60 * 1000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Outcome of an atomic check-and-record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// Submission accepted; `now` has been recorded
    Allowed,
    /// Submission rejected; the prior record is untouched
    Throttled { days_remaining: i64 },
}

/// Days until the window elapses, rounded up for the user-facing countdown
pub fn days_remaining(elapsed_ms: i64) -> i64 {
    let remaining = COOLDOWN_PERIOD_MS - elapsed_ms;
    (remaining + DAY_MS - 1) / DAY_MS
}

/// Atomic per-email cooldown store
///
/// `check_and_record` must be atomic with respect to concurrent calls for
/// the same email: a naive read-then-write would let two submissions
/// through inside one window.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    async fn check_and_record(&self, email: &str, now_ms: i64) -> Result<CooldownDecision>;
}

/// Process-local store (reference behavior; does not survive restarts)
#[derive(Default)]
pub struct MemoryCooldownStore {
    records: Mutex<HashMap<String, i64>>,
}

impl MemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CooldownStore for MemoryCooldownStore {
    async fn check_and_record(&self, email: &str, now_ms: i64) -> Result<CooldownDecision> {
        // The mutex makes the read-modify-write atomic
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(&prior) = records.get(email) {
            let elapsed = now_ms - prior;
            if elapsed < COOLDOWN_PERIOD_MS {
                return Ok(CooldownDecision::Throttled {
                    days_remaining: days_remaining(elapsed),
                });
            }
        }

        records.insert(email.to_string(), now_ms);
        Ok(CooldownDecision::Allowed)
    }
}

/// Durable store backed by the service database
///
/// The expiry comparison and overwrite are one conditional upsert, so
/// atomicity holds across processes as well.
pub struct SqliteCooldownStore {
    pool: SqlitePool,
}

impl SqliteCooldownStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CooldownStore for SqliteCooldownStore {
    async fn check_and_record(&self, email: &str, now_ms: i64) -> Result<CooldownDecision> {
        let recorded =
            crate::db::cooldowns::try_record(&self.pool, email, now_ms, COOLDOWN_PERIOD_MS).await?;

        if recorded {
            return Ok(CooldownDecision::Allowed);
        }

        let prior = crate::db::cooldowns::last_submission_ms(&self.pool, email)
            .await?
            .unwrap_or(now_ms);
        Ok(CooldownDecision::Throttled {
            days_remaining: days_remaining(now_ms - prior),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = DAY_MS;

    #[tokio::test]
    async fn first_submission_is_allowed_and_recorded() {
        let store = MemoryCooldownStore::new();
        let decision = store.check_and_record("anya@example.com", 1_000).await.unwrap();
        assert_eq!(decision, CooldownDecision::Allowed);

        // Immediately retrying is throttled for the full 7 days
        let decision = store.check_and_record("anya@example.com", 1_001).await.unwrap();
        assert_eq!(decision, CooldownDecision::Throttled { days_remaining: 7 });
    }

    #[tokio::test]
    async fn resubmitting_two_days_later_reports_five_days() {
        let store = MemoryCooldownStore::new();
        store.check_and_record("anya@example.com", 0).await.unwrap();

        let decision = store
            .check_and_record("anya@example.com", 2 * DAY)
            .await
            .unwrap();
        assert_eq!(decision, CooldownDecision::Throttled { days_remaining: 5 });
    }

    #[tokio::test]
    async fn rejected_attempts_do_not_reset_the_window() {
        let store = MemoryCooldownStore::new();
        store.check_and_record("anya@example.com", 0).await.unwrap();

        // A rejected attempt at day 6 must not push the window out
        store.check_and_record("anya@example.com", 6 * DAY).await.unwrap();
        let decision = store
            .check_and_record("anya@example.com", 7 * DAY)
            .await
            .unwrap();
        assert_eq!(decision, CooldownDecision::Allowed);
    }

    #[tokio::test]
    async fn window_expiry_allows_and_rerecords() {
        let store = MemoryCooldownStore::new();
        store.check_and_record("anya@example.com", 0).await.unwrap();

        let decision = store
            .check_and_record("anya@example.com", COOLDOWN_PERIOD_MS)
            .await
            .unwrap();
        assert_eq!(decision, CooldownDecision::Allowed);

        // The new record anchors the next window
        let decision = store
            .check_and_record("anya@example.com", COOLDOWN_PERIOD_MS + DAY)
            .await
            .unwrap();
        assert_eq!(decision, CooldownDecision::Throttled { days_remaining: 6 });
    }

    #[tokio::test]
    async fn emails_are_throttled_independently() {
        let store = MemoryCooldownStore::new();
        store.check_and_record("anya@example.com", 0).await.unwrap();

        let decision = store.check_and_record("ravi@example.com", 1).await.unwrap();
        assert_eq!(decision, CooldownDecision::Allowed);
    }

    #[tokio::test]
    async fn sqlite_store_matches_memory_semantics() {
        // Single connection so the in-memory database is shared
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::initialize_schema(&pool).await.unwrap();
        let store = SqliteCooldownStore::new(pool);

        assert_eq!(
            store.check_and_record("anya@example.com", 0).await.unwrap(),
            CooldownDecision::Allowed
        );
        assert_eq!(
            store
                .check_and_record("anya@example.com", 2 * DAY)
                .await
                .unwrap(),
            CooldownDecision::Throttled { days_remaining: 5 }
        );
        // Rejection left the original record in place
        assert_eq!(
            store
                .check_and_record("anya@example.com", COOLDOWN_PERIOD_MS)
                .await
                .unwrap(),
            CooldownDecision::Allowed
        );
    }

    #[test]
    fn day_math_rounds_up() {
        assert_eq!(days_remaining(0), 7);
        assert_eq!(days_remaining(2 * DAY), 5);
        assert_eq!(days_remaining(6 * DAY + 1), 1);
        assert_eq!(days_remaining(COOLDOWN_PERIOD_MS - 1), 1);
    }
}
