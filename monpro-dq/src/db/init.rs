//! Database pool initialization and schema creation

use monpro_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (or create) the service database and ensure the schema exists
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;
    info!("Database ready: {}", db_path.display());
    Ok(pool)
}

/// Create tables if missing; also used by tests against `sqlite::memory:`
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS battlecards (
            lead_id TEXT PRIMARY KEY,
            region TEXT NOT NULL,
            path TEXT NOT NULL,
            email TEXT NOT NULL,
            priority_score INTEGER NOT NULL,
            payload TEXT NOT NULL,
            generated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submission_cooldowns (
            email TEXT PRIMARY KEY,
            last_submission_ms INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
