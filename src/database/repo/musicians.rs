//! Musician queries. Musicians have no tenant column; every query here
//! is scoped to a parent event id that callers have already resolved
//! through the hierarchy resolver.

use sqlx::PgPool;

use crate::database::models::Musician;
use crate::error::ApiError;

pub struct NewMusician {
    pub nome_musico: String,
    pub funcao: String,
}

#[derive(Default)]
pub struct MusicianChanges {
    pub nome_musico: Option<String>,
    pub funcao: Option<String>,
}

pub async fn list_for_event(pool: &PgPool, event_id: i64) -> Result<Vec<Musician>, ApiError> {
    let musicians =
        sqlx::query_as::<_, Musician>("SELECT * FROM musicos_evento WHERE event_id = $1 ORDER BY id")
            .bind(event_id)
            .fetch_all(pool)
            .await?;
    Ok(musicians)
}

/// Batch fetch for list expansion (GET /eventos?with=musicos).
pub async fn for_events(pool: &PgPool, event_ids: &[i64]) -> Result<Vec<Musician>, ApiError> {
    if event_ids.is_empty() {
        return Ok(vec![]);
    }
    let musicians = sqlx::query_as::<_, Musician>(
        "SELECT * FROM musicos_evento WHERE event_id = ANY($1) ORDER BY id",
    )
    .bind(event_ids)
    .fetch_all(pool)
    .await?;
    Ok(musicians)
}

/// Lookup always filtered by the verified parent event id.
pub async fn find_in_event(
    pool: &PgPool,
    event_id: i64,
    id: i64,
) -> Result<Option<Musician>, ApiError> {
    let musician = sqlx::query_as::<_, Musician>(
        "SELECT * FROM musicos_evento WHERE id = $1 AND event_id = $2",
    )
    .bind(id)
    .bind(event_id)
    .fetch_optional(pool)
    .await?;
    Ok(musician)
}

pub async fn create(
    pool: &PgPool,
    event_id: i64,
    new: NewMusician,
) -> Result<Musician, ApiError> {
    let musician = sqlx::query_as::<_, Musician>(
        "INSERT INTO musicos_evento (event_id, nome_musico, funcao) \
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(event_id)
    .bind(new.nome_musico)
    .bind(new.funcao)
    .fetch_one(pool)
    .await?;
    Ok(musician)
}

/// Update filtered by (id, event_id) so a stale or foreign id cannot
/// touch another event's roster.
pub async fn update(
    pool: &PgPool,
    event_id: i64,
    id: i64,
    changes: MusicianChanges,
) -> Result<Musician, ApiError> {
    let musician = sqlx::query_as::<_, Musician>(
        "UPDATE musicos_evento SET \
            nome_musico = COALESCE($3, nome_musico), \
            funcao = COALESCE($4, funcao) \
         WHERE id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(event_id)
    .bind(changes.nome_musico)
    .bind(changes.funcao)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Musician not found"))?;
    Ok(musician)
}

pub async fn delete(pool: &PgPool, event_id: i64, id: i64) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM musicos_evento WHERE id = $1 AND event_id = $2")
        .bind(id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(())
}
