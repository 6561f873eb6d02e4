use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A band account: the tenant and the unit of data isolation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Band {
    pub id: i64,
    pub nome: String,
    pub email: String,
    /// Argon2id PHC hash, never exposed over the wire
    #[serde(skip_serializing)]
    pub password: String,
    pub plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription plan. Stored as its lowercase label in bandas.plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "free" => Some(Plan::Free),
            "pro" => Some(Plan::Pro),
            _ => None,
        }
    }
}
