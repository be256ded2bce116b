//! Submission cooldown persistence
//!
//! The check-and-record is a single conditional upsert so two concurrent
//! submissions from the same email cannot both pass inside one window.

use monpro_common::Result;
use sqlx::SqlitePool;

/// Atomically record `now_ms` for `email` if no record exists or the
/// prior record is at least `window_ms` old. Returns whether the record
/// was written (i.e. the submission is allowed).
pub async fn try_record(
    pool: &SqlitePool,
    email: &str,
    now_ms: i64,
    window_ms: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO submission_cooldowns (email, last_submission_ms)
        VALUES (?1, ?2)
        ON CONFLICT(email) DO UPDATE SET last_submission_ms = excluded.last_submission_ms
        WHERE excluded.last_submission_ms - submission_cooldowns.last_submission_ms >= ?3
        "#,
    )
    .bind(email)
    .bind(now_ms)
    .bind(window_ms)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Timestamp of the last accepted submission for `email`, if any
pub async fn last_submission_ms(pool: &SqlitePool, email: &str) -> Result<Option<i64>> {
    let record: Option<i64> = sqlx::query_scalar(
        "SELECT last_submission_ms FROM submission_cooldowns WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
