//! Bearer-token registry. Issued JWTs carry a jti that must match a row
//! here; logout deletes the row, revoking the token immediately.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::ApiToken;
use crate::error::ApiError;

/// Register a fresh token id for a band.
pub async fn issue(pool: &PgPool, band_id: i64) -> Result<ApiToken, ApiError> {
    let token = sqlx::query_as::<_, ApiToken>(
        "INSERT INTO api_tokens (id, band_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(band_id)
    .fetch_one(pool)
    .await?;
    Ok(token)
}

/// Whether a token is still live and belongs to the claimed band.
pub async fn is_live(pool: &PgPool, id: Uuid, band_id: i64) -> Result<bool, ApiError> {
    let (live,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM api_tokens WHERE id = $1 AND band_id = $2)",
    )
    .bind(id)
    .bind(band_id)
    .fetch_one(pool)
    .await?;
    Ok(live)
}

/// Revoke one token (logout of the current session).
pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM api_tokens WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
