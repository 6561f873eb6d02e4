//! Event CRUD. Every read goes through the tenant scope filter; every
//! by-id operation re-checks ownership before returning or mutating.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::collections::HashMap;

use crate::config;
use crate::database::models::{Event, EventWithRelations};
use crate::database::repo::{events, musicians, songs};
use crate::database::Database;
use crate::error::ApiError;
use crate::middleware::AuthBand;
use crate::tenancy::EventScoped;
use crate::validation::{
    bail, optional_string, required_date, required_string, required_time, sometimes_string,
    FieldErrors,
};

use super::double_option;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Relations to expand, e.g. with=musicos,musicas
    pub with: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub titulo: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub local: Option<Option<String>>,
}

/// Allow-listed relation expansions; unknown values are dropped, not errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Expansions {
    musicos: bool,
    musicas: bool,
}

fn parse_expansions(with: Option<&str>) -> Expansions {
    let mut expansions = Expansions::default();
    let Some(with) = with else {
        return expansions;
    };
    for relation in with.split(',').map(str::trim) {
        match relation {
            "musicos" => expansions.musicos = true,
            "musicas" => expansions.musicas = true,
            _ => {}
        }
    }
    expansions
}

fn clamp_per_page(requested: Option<i64>) -> i64 {
    let api = &config::config().api;
    requested
        .unwrap_or(api.default_per_page)
        .clamp(1, api.max_per_page)
}

fn last_page(total: i64, per_page: i64) -> i64 {
    if total == 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

fn group_by_event<T: EventScoped>(items: Vec<T>) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(item.event_id()).or_default().push(item);
    }
    grouped
}

async fn expand_events(
    pool: &PgPool,
    events: Vec<Event>,
    expansions: Expansions,
) -> Result<Vec<EventWithRelations>, ApiError> {
    let ids: Vec<i64> = events.iter().map(|e| e.id).collect();

    let mut musicos = if expansions.musicos {
        Some(group_by_event(musicians::for_events(pool, &ids).await?))
    } else {
        None
    };
    let mut musicas = if expansions.musicas {
        Some(group_by_event(songs::for_events(pool, &ids).await?))
    } else {
        None
    };

    Ok(events
        .into_iter()
        .map(|event| EventWithRelations {
            musicos: musicos
                .as_mut()
                .map(|m| m.remove(&event.id).unwrap_or_default()),
            musicas: musicas
                .as_mut()
                .map(|m| m.remove(&event.id).unwrap_or_default()),
            event,
        })
        .collect())
}

/// Single-event responses always embed both relations.
async fn with_relations(pool: &PgPool, event: Event) -> Result<EventWithRelations, ApiError> {
    Ok(EventWithRelations {
        musicos: Some(musicians::list_for_event(pool, event.id).await?),
        musicas: Some(songs::list_for_event(pool, event.id).await?),
        event,
    })
}

/// GET /eventos - list the band's events, optionally expanded/paginated
pub async fn index(
    Extension(auth): Extension<AuthBand>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let ctx = auth.context();
    let expansions = parse_expansions(query.with.as_deref());

    if let Some(page) = query.page {
        let page = page.max(1);
        let per_page = clamp_per_page(query.per_page);
        let (page_events, total) = events::list_page(&pool, &ctx, per_page, page).await?;
        let expanded = expand_events(&pool, page_events, expansions).await?;

        return Ok(Json(json!({
            "eventos": expanded,
            "pagination": {
                "current_page": page,
                "last_page": last_page(total, per_page),
                "per_page": per_page,
                "total": total,
            },
        })));
    }

    let all = events::list(&pool, &ctx).await?;
    let expanded = expand_events(&pool, all, expansions).await?;

    Ok(Json(json!({ "eventos": expanded })))
}

/// POST /eventos - create an event owned by the authenticated band
pub async fn store(
    Extension(auth): Extension<AuthBand>,
    Json(body): Json<EventBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = Database::pool().await?;

    let mut errors = FieldErrors::new();
    let titulo = required_string(&mut errors, "titulo", body.titulo.as_deref(), 255);
    let data = required_date(&mut errors, "data", body.data.as_deref());
    let hora = required_time(&mut errors, "hora", body.hora.as_deref());
    let local = optional_string(&mut errors, "local", body.local.flatten().as_deref(), 255);
    bail(errors)?;

    let event = events::create(
        &pool,
        &auth.context(),
        events::NewEvent {
            titulo: titulo.unwrap(),
            data: data.unwrap(),
            hora: hora.unwrap(),
            local,
        },
    )
    .await?;

    let evento = with_relations(&pool, event).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully",
            "evento": evento,
        })),
    ))
}

/// GET /eventos/:id - single event with relations
pub async fn show(
    Extension(auth): Extension<AuthBand>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = events::find_owned(&pool, &auth.context(), id).await?;
    let evento = with_relations(&pool, event).await?;

    Ok(Json(json!({ "evento": evento })))
}

/// PUT /eventos/:id - partial update of an owned event
pub async fn update(
    Extension(auth): Extension<AuthBand>,
    Path(id): Path<i64>,
    Json(body): Json<EventBody>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = events::find_owned(&pool, &auth.context(), id).await?;

    let mut errors = FieldErrors::new();
    let titulo = sometimes_string(&mut errors, "titulo", body.titulo.as_deref(), 255);
    let data = match body.data.as_deref() {
        Some(v) => required_date(&mut errors, "data", Some(v)),
        None => None,
    };
    let hora = match body.hora.as_deref() {
        Some(v) => required_time(&mut errors, "hora", Some(v)),
        None => None,
    };
    let local = body
        .local
        .map(|value| optional_string(&mut errors, "local", value.as_deref(), 255));
    bail(errors)?;

    let updated = events::update(
        &pool,
        event.id,
        events::EventChanges {
            titulo,
            data,
            hora,
            local,
        },
    )
    .await?;

    let evento = with_relations(&pool, updated).await?;
    Ok(Json(json!({
        "message": "Event updated successfully",
        "evento": evento,
    })))
}

/// DELETE /eventos/:id - delete an owned event (children cascade)
pub async fn destroy(
    Extension(auth): Extension<AuthBand>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = events::find_owned(&pool, &auth.context(), id).await?;
    events::delete(&pool, event.id).await?;

    Ok(Json(json!({
        "message": "Event deleted successfully",
    })))
}
