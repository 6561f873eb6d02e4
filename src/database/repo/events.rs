//! Event queries. Events carry the tenant column (band_id), so every
//! read here goes through the scope filter: queries take an explicit
//! `&TenantContext` and narrow to the current band, and an anonymous
//! context short-circuits to the empty result without touching the
//! database. Writes take the band from the context, never from input.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::database::models::Event;
use crate::error::ApiError;
use crate::tenancy::{ensure_owned, TenantContext};

pub struct NewEvent {
    pub titulo: String,
    pub data: NaiveDate,
    pub hora: NaiveTime,
    pub local: Option<String>,
}

/// Partial update: None leaves a field unchanged. local distinguishes
/// "absent" (None) from "explicitly cleared" (Some(None)).
#[derive(Default)]
pub struct EventChanges {
    pub titulo: Option<String>,
    pub data: Option<NaiveDate>,
    pub hora: Option<NaiveTime>,
    pub local: Option<Option<String>>,
}

/// List the current band's events, newest first.
pub async fn list(pool: &PgPool, ctx: &TenantContext) -> Result<Vec<Event>, ApiError> {
    let Some(band_id) = ctx.band_id() else {
        return Ok(vec![]);
    };

    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM eventos WHERE band_id = $1 ORDER BY data DESC, hora DESC",
    )
    .bind(band_id)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// One page of the current band's events plus the scoped total.
pub async fn list_page(
    pool: &PgPool,
    ctx: &TenantContext,
    per_page: i64,
    page: i64,
) -> Result<(Vec<Event>, i64), ApiError> {
    let Some(band_id) = ctx.band_id() else {
        return Ok((vec![], 0));
    };

    let offset = (page.max(1) - 1) * per_page;
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM eventos WHERE band_id = $1 ORDER BY data DESC, hora DESC LIMIT $2 OFFSET $3",
    )
    .bind(band_id)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM eventos WHERE band_id = $1")
        .bind(band_id)
        .fetch_one(pool)
        .await?;

    Ok((events, total))
}

/// Find one event narrowed to the current band.
pub async fn find_scoped(
    pool: &PgPool,
    ctx: &TenantContext,
    id: i64,
) -> Result<Option<Event>, ApiError> {
    let Some(band_id) = ctx.band_id() else {
        return Ok(None);
    };

    let event = sqlx::query_as::<_, Event>("SELECT * FROM eventos WHERE id = $1 AND band_id = $2")
        .bind(id)
        .bind(band_id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

async fn exists(pool: &PgPool, id: i64) -> Result<bool, ApiError> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM eventos WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Resolve an event by id for a single-resource view or mutation.
///
/// The scoped lookup and the ownership guard are both applied: a hit is
/// re-verified against the context, a miss is split into NotFound (no
/// such event at all) or Forbidden (exists under another band).
pub async fn find_owned(pool: &PgPool, ctx: &TenantContext, id: i64) -> Result<Event, ApiError> {
    match find_scoped(pool, ctx, id).await? {
        Some(event) => {
            ensure_owned(&event, ctx)?;
            Ok(event)
        }
        None => {
            if exists(pool, id).await? {
                Err(ApiError::forbidden(
                    "You do not have permission to access this event",
                ))
            } else {
                Err(ApiError::not_found("Event not found"))
            }
        }
    }
}

/// Create an event for the current band. band_id comes from the context.
pub async fn create(pool: &PgPool, ctx: &TenantContext, new: NewEvent) -> Result<Event, ApiError> {
    let Some(band_id) = ctx.band_id() else {
        return Err(ApiError::forbidden(
            "You must be authenticated to create an event",
        ));
    };

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO eventos (band_id, titulo, data, hora, local) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(band_id)
    .bind(new.titulo)
    .bind(new.data)
    .bind(new.hora)
    .bind(new.local)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Apply a partial update to an already-guarded event.
pub async fn update(pool: &PgPool, id: i64, changes: EventChanges) -> Result<Event, ApiError> {
    let (local_set, local) = match changes.local {
        Some(value) => (true, value),
        None => (false, None),
    };

    let event = sqlx::query_as::<_, Event>(
        "UPDATE eventos SET \
            titulo = COALESCE($2, titulo), \
            data = COALESCE($3, data), \
            hora = COALESCE($4, hora), \
            local = CASE WHEN $5 THEN $6 ELSE local END, \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(changes.titulo)
    .bind(changes.data)
    .bind(changes.hora)
    .bind(local_set)
    .bind(local)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Delete an already-guarded event. Musicians and songs cascade in the
/// database.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM eventos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy_pool() -> PgPool {
        // Never connects; the default-deny paths must return before any
        // query is issued.
        PgPool::connect_lazy("postgres://localhost/unreachable").unwrap()
    }

    #[tokio::test]
    async fn anonymous_list_is_empty_without_querying() {
        let pool = lazy_pool();
        let events = list(&pool, &TenantContext::anonymous()).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn anonymous_page_is_empty_without_querying() {
        let pool = lazy_pool();
        let (events, total) = list_page(&pool, &TenantContext::anonymous(), 15, 1)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn anonymous_find_sees_nothing() {
        let pool = lazy_pool();
        let event = find_scoped(&pool, &TenantContext::anonymous(), 1)
            .await
            .unwrap();
        assert!(event.is_none());
    }

    #[tokio::test]
    async fn anonymous_create_is_forbidden() {
        let pool = lazy_pool();
        let err = create(
            &pool,
            &TenantContext::anonymous(),
            NewEvent {
                titulo: "Show".to_string(),
                data: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                hora: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                local: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
