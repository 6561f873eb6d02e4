use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::tenancy::EventScoped;

/// A setlist entry. The setlist order comes from `ordem`, not from id or
/// insertion sequence; positions are not required to be unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: i64,
    pub event_id: i64,
    pub titulo_musica: String,
    pub artista_ou_tom: Option<String>,
    pub ordem: i32,
    pub link_musica: Option<String>,
}

impl EventScoped for Song {
    fn event_id(&self) -> i64 {
        self.event_id
    }
}
