use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::models::{Musician, Song};
use crate::tenancy::TenantOwned;

/// A band's event. band_id is the tenant column: it is assigned once at
/// creation from the authenticated principal and never from client input.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub band_id: i64,
    pub titulo: String,
    pub data: NaiveDate,
    pub hora: NaiveTime,
    pub local: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Event {
    fn owning_band(&self) -> i64 {
        self.band_id
    }
}

/// Event response shape with optionally expanded relations
/// (GET /eventos?with=musicos,musicas and single-event views).
#[derive(Debug, Serialize)]
pub struct EventWithRelations {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub musicos: Option<Vec<Musician>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub musicas: Option<Vec<Song>>,
}

impl EventWithRelations {
    pub fn bare(event: Event) -> Self {
        Self {
            event,
            musicos: None,
            musicas: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: 7,
            band_id: 3,
            titulo: "Festival set".to_string(),
            data: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            hora: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            local: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owning_band_is_the_tenant_column() {
        assert_eq!(sample_event().owning_band(), 3);
    }

    #[test]
    fn relations_are_omitted_when_not_expanded() {
        let value = serde_json::to_value(EventWithRelations::bare(sample_event())).unwrap();
        assert!(value.get("musicos").is_none());
        assert!(value.get("musicas").is_none());
        assert_eq!(value["titulo"], "Festival set");
    }

    #[test]
    fn expanded_relations_are_flattened_alongside_event_fields() {
        let with = EventWithRelations {
            event: sample_event(),
            musicos: Some(vec![]),
            musicas: Some(vec![]),
        };
        let value = serde_json::to_value(with).unwrap();
        assert_eq!(value["musicos"], serde_json::json!([]));
        assert_eq!(value["id"], 7);
    }
}
