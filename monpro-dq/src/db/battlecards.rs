//! Battlecard vault persistence

use crate::models::Battlecard;
use monpro_common::Result;
use sqlx::SqlitePool;

/// Persist a battlecard; the full JSON payload is kept for audit
pub async fn save_battlecard(pool: &SqlitePool, card: &Battlecard) -> Result<()> {
    let payload = serde_json::to_string(card)
        .map_err(|e| monpro_common::Error::Internal(format!("Serialize battlecard: {}", e)))?;

    sqlx::query(
        r#"
        INSERT OR REPLACE INTO battlecards
            (lead_id, region, path, email, priority_score, payload, generated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&card.lead_id)
    .bind(card.region.as_str())
    .bind(card.path.as_str())
    .bind(&card.email)
    .bind(card.priority_score as i64)
    .bind(payload)
    .bind(card.generated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a stored battlecard by lead id
pub async fn load_battlecard(pool: &SqlitePool, lead_id: &str) -> Result<Option<Battlecard>> {
    let payload: Option<String> =
        sqlx::query_scalar("SELECT payload FROM battlecards WHERE lead_id = ?1")
            .bind(lead_id)
            .fetch_optional(pool)
            .await?;

    match payload {
        Some(json) => {
            let card = serde_json::from_str(&json)
                .map_err(|e| monpro_common::Error::Internal(format!("Parse battlecard: {}", e)))?;
            Ok(Some(card))
        }
        None => Ok(None),
    }
}
