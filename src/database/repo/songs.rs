//! Setlist (song) queries, always scoped to a verified parent event id,
//! plus the bulk reorder used by POST /eventos/:id/musicas/reorder.

use sqlx::PgPool;

use crate::database::models::Song;
use crate::error::ApiError;

pub struct NewSong {
    pub titulo_musica: String,
    pub artista_ou_tom: Option<String>,
    pub ordem: i32,
    pub link_musica: Option<String>,
}

/// Partial update. artista_ou_tom / link_musica distinguish "absent"
/// from "explicitly cleared".
#[derive(Default)]
pub struct SongChanges {
    pub titulo_musica: Option<String>,
    pub artista_ou_tom: Option<Option<String>>,
    pub ordem: Option<i32>,
    pub link_musica: Option<Option<String>>,
}

/// One validated positional assignment in a reorder batch.
#[derive(Debug, Clone)]
pub struct ReorderEntry {
    pub id: i64,
    pub ordem: i32,
}

/// The setlist: songs ordered by position.
pub async fn list_for_event(pool: &PgPool, event_id: i64) -> Result<Vec<Song>, ApiError> {
    let songs = sqlx::query_as::<_, Song>(
        "SELECT * FROM musicas_evento WHERE event_id = $1 ORDER BY ordem, id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

/// Batch fetch for list expansion (GET /eventos?with=musicas).
pub async fn for_events(pool: &PgPool, event_ids: &[i64]) -> Result<Vec<Song>, ApiError> {
    if event_ids.is_empty() {
        return Ok(vec![]);
    }
    let songs = sqlx::query_as::<_, Song>(
        "SELECT * FROM musicas_evento WHERE event_id = ANY($1) ORDER BY ordem, id",
    )
    .bind(event_ids)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

/// Lookup always filtered by the verified parent event id.
pub async fn find_in_event(pool: &PgPool, event_id: i64, id: i64) -> Result<Option<Song>, ApiError> {
    let song =
        sqlx::query_as::<_, Song>("SELECT * FROM musicas_evento WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .fetch_optional(pool)
            .await?;
    Ok(song)
}

pub async fn create(pool: &PgPool, event_id: i64, new: NewSong) -> Result<Song, ApiError> {
    let song = sqlx::query_as::<_, Song>(
        "INSERT INTO musicas_evento (event_id, titulo_musica, artista_ou_tom, ordem, link_musica) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(event_id)
    .bind(new.titulo_musica)
    .bind(new.artista_ou_tom)
    .bind(new.ordem)
    .bind(new.link_musica)
    .fetch_one(pool)
    .await?;
    Ok(song)
}

pub async fn update(
    pool: &PgPool,
    event_id: i64,
    id: i64,
    changes: SongChanges,
) -> Result<Song, ApiError> {
    let (artista_set, artista) = match changes.artista_ou_tom {
        Some(value) => (true, value),
        None => (false, None),
    };
    let (link_set, link) = match changes.link_musica {
        Some(value) => (true, value),
        None => (false, None),
    };

    let song = sqlx::query_as::<_, Song>(
        "UPDATE musicas_evento SET \
            titulo_musica = COALESCE($3, titulo_musica), \
            artista_ou_tom = CASE WHEN $4 THEN $5 ELSE artista_ou_tom END, \
            ordem = COALESCE($6, ordem), \
            link_musica = CASE WHEN $7 THEN $8 ELSE link_musica END \
         WHERE id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(event_id)
    .bind(changes.titulo_musica)
    .bind(artista_set)
    .bind(artista)
    .bind(changes.ordem)
    .bind(link_set)
    .bind(link)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Song not found"))?;
    Ok(song)
}

pub async fn delete(pool: &PgPool, event_id: i64, id: i64) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM musicas_evento WHERE id = $1 AND event_id = $2")
        .bind(id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Setlist reorder engine.
///
/// Each entry is an independent positional update matched on
/// (id, event_id): an id that belongs to another event matches zero
/// rows and is silently ignored. Last write wins per id; positions are
/// not required to end up unique or contiguous. The whole batch runs in
/// one transaction so a failure mid-batch leaves no partial reorder
/// visible. Returns the resulting setlist ordered by position.
pub async fn reorder(
    pool: &PgPool,
    event_id: i64,
    entries: &[ReorderEntry],
) -> Result<Vec<Song>, ApiError> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        sqlx::query("UPDATE musicas_evento SET ordem = $1 WHERE id = $2 AND event_id = $3")
            .bind(entry.ordem)
            .bind(entry.id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    list_for_event(pool, event_id).await
}
