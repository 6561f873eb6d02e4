use sqlx::PgPool;

use crate::database::models::{Event, Musician, Song};
use crate::database::repo::{events, musicians, songs};
use crate::error::ApiError;
use crate::tenancy::TenantContext;

/// Resolve the parent event of a sub-resource path.
///
/// NotFound if no such event exists, Forbidden if it belongs to another
/// band. Only an event returned from here may be used to look up
/// children.
pub async fn owned_event(
    pool: &PgPool,
    ctx: &TenantContext,
    event_id: i64,
) -> Result<Event, ApiError> {
    events::find_owned(pool, ctx, event_id).await
}

/// Resolve a musician strictly within an already-verified event.
///
/// The lookup is always filtered by the event id, so a musician id from
/// some other event resolves to NotFound regardless of who owns that
/// other event. It never falls back to a bare find-by-id.
pub async fn musician_in_event(
    pool: &PgPool,
    event: &Event,
    musician_id: i64,
) -> Result<Musician, ApiError> {
    musicians::find_in_event(pool, event.id, musician_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Musician not found"))
}

/// Resolve a song strictly within an already-verified event.
pub async fn song_in_event(pool: &PgPool, event: &Event, song_id: i64) -> Result<Song, ApiError> {
    songs::find_in_event(pool, event.id, song_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Song not found"))
}
