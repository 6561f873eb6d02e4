//! Musician sub-resource CRUD. Every operation first resolves the
//! parent event through the hierarchy resolver, so a musician can never
//! be reached except through an event the caller's band owns.

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::repo::musicians;
use crate::database::Database;
use crate::error::ApiError;
use crate::middleware::AuthBand;
use crate::tenancy::hierarchy;
use crate::validation::{bail, required_string, sometimes_string, FieldErrors};

#[derive(Debug, Deserialize)]
pub struct MusicianBody {
    pub nome_musico: Option<String>,
    pub funcao: Option<String>,
}

/// GET /eventos/:eventId/musicos - the event's roster
pub async fn index(
    Extension(auth): Extension<AuthBand>,
    Path(event_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musicos = musicians::list_for_event(&pool, event.id).await?;

    Ok(Json(json!({ "musicos": musicos })))
}

/// POST /eventos/:eventId/musicos - add a musician to the event
pub async fn store(
    Extension(auth): Extension<AuthBand>,
    Path(event_id): Path<i64>,
    Json(body): Json<MusicianBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;

    let mut errors = FieldErrors::new();
    let nome_musico = required_string(&mut errors, "nome_musico", body.nome_musico.as_deref(), 100);
    let funcao = required_string(&mut errors, "funcao", body.funcao.as_deref(), 100);
    bail(errors)?;

    let musico = musicians::create(
        &pool,
        event.id,
        musicians::NewMusician {
            nome_musico: nome_musico.unwrap(),
            funcao: funcao.unwrap(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Musician added successfully",
            "musico": musico,
        })),
    ))
}

/// GET /eventos/:eventId/musicos/:musicoId
pub async fn show(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musico_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musico = hierarchy::musician_in_event(&pool, &event, musico_id).await?;

    Ok(Json(json!({ "musico": musico })))
}

/// PUT /eventos/:eventId/musicos/:musicoId - partial update
pub async fn update(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musico_id)): Path<(i64, i64)>,
    Json(body): Json<MusicianBody>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musico = hierarchy::musician_in_event(&pool, &event, musico_id).await?;

    let mut errors = FieldErrors::new();
    let nome_musico = sometimes_string(&mut errors, "nome_musico", body.nome_musico.as_deref(), 100);
    let funcao = sometimes_string(&mut errors, "funcao", body.funcao.as_deref(), 100);
    bail(errors)?;

    let musico = musicians::update(
        &pool,
        event.id,
        musico.id,
        musicians::MusicianChanges {
            nome_musico,
            funcao,
        },
    )
    .await?;

    Ok(Json(json!({
        "message": "Musician updated successfully",
        "musico": musico,
    })))
}

/// DELETE /eventos/:eventId/musicos/:musicoId
pub async fn destroy(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musico_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musico = hierarchy::musician_in_event(&pool, &event, musico_id).await?;
    musicians::delete(&pool, event.id, musico.id).await?;

    Ok(Json(json!({
        "message": "Musician removed successfully",
    })))
}
