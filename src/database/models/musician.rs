use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::tenancy::EventScoped;

/// A musician on one event's roster. Has no tenant column of its own;
/// ownership is always one hop away through the parent event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Musician {
    pub id: i64,
    pub event_id: i64,
    pub nome_musico: String,
    pub funcao: String,
}

impl EventScoped for Musician {
    fn event_id(&self) -> i64 {
        self.event_id
    }
}
