use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A live bearer token. The id matches the jti claim of the issued JWT;
/// deleting the row revokes the token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiToken {
    pub id: Uuid,
    pub band_id: i64,
    pub created_at: DateTime<Utc>,
}
