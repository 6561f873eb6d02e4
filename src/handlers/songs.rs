//! Song (setlist) sub-resource CRUD plus the bulk reorder endpoint.
//! Like musicians, songs are only reachable through an owned event.

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::repo::songs::{self, ReorderEntry};
use crate::database::Database;
use crate::error::ApiError;
use crate::middleware::AuthBand;
use crate::tenancy::hierarchy;
use crate::validation::{
    add_error, bail, optional_position, optional_string, optional_url, required_string,
    sometimes_string, FieldErrors,
};

use super::double_option;

#[derive(Debug, Deserialize)]
pub struct SongBody {
    pub titulo_musica: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub artista_ou_tom: Option<Option<String>>,
    pub ordem: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub link_musica: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub musicas: Option<Vec<ReorderEntryBody>>,
}

/// Wire shape of one reorder entry. Fields are optional so a missing
/// id or ordem surfaces as a per-entry field error instead of a body
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ReorderEntryBody {
    pub id: Option<i64>,
    pub ordem: Option<i32>,
}

/// GET /eventos/:eventId/musicas - the setlist, ordered by position
pub async fn index(
    Extension(auth): Extension<AuthBand>,
    Path(event_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musicas = songs::list_for_event(&pool, event.id).await?;

    Ok(Json(json!({ "musicas": musicas })))
}

/// POST /eventos/:eventId/musicas - add a song to the setlist
pub async fn store(
    Extension(auth): Extension<AuthBand>,
    Path(event_id): Path<i64>,
    Json(body): Json<SongBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;

    let mut errors = FieldErrors::new();
    let titulo_musica =
        required_string(&mut errors, "titulo_musica", body.titulo_musica.as_deref(), 255);
    let artista_ou_tom = optional_string(
        &mut errors,
        "artista_ou_tom",
        body.artista_ou_tom.flatten().as_deref(),
        100,
    );
    let ordem = optional_position(&mut errors, "ordem", body.ordem);
    let link_musica = optional_url(
        &mut errors,
        "link_musica",
        body.link_musica.flatten().as_deref(),
        2048,
    );
    bail(errors)?;

    let musica = songs::create(
        &pool,
        event.id,
        songs::NewSong {
            titulo_musica: titulo_musica.unwrap(),
            artista_ou_tom,
            ordem: ordem.unwrap_or(0),
            link_musica,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Song added successfully",
            "musica": musica,
        })),
    ))
}

/// GET /eventos/:eventId/musicas/:musicaId
pub async fn show(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musica_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musica = hierarchy::song_in_event(&pool, &event, musica_id).await?;

    Ok(Json(json!({ "musica": musica })))
}

/// PUT /eventos/:eventId/musicas/:musicaId - partial update
pub async fn update(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musica_id)): Path<(i64, i64)>,
    Json(body): Json<SongBody>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musica = hierarchy::song_in_event(&pool, &event, musica_id).await?;

    let mut errors = FieldErrors::new();
    let titulo_musica =
        sometimes_string(&mut errors, "titulo_musica", body.titulo_musica.as_deref(), 255);
    let artista_ou_tom = body
        .artista_ou_tom
        .map(|value| optional_string(&mut errors, "artista_ou_tom", value.as_deref(), 100));
    let ordem = optional_position(&mut errors, "ordem", body.ordem);
    let link_musica = body
        .link_musica
        .map(|value| optional_url(&mut errors, "link_musica", value.as_deref(), 2048));
    bail(errors)?;

    let musica = songs::update(
        &pool,
        event.id,
        musica.id,
        songs::SongChanges {
            titulo_musica,
            artista_ou_tom,
            ordem,
            link_musica,
        },
    )
    .await?;

    Ok(Json(json!({
        "message": "Song updated successfully",
        "musica": musica,
    })))
}

/// DELETE /eventos/:eventId/musicas/:musicaId
pub async fn destroy(
    Extension(auth): Extension<AuthBand>,
    Path((event_id, musica_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;
    let musica = hierarchy::song_in_event(&pool, &event, musica_id).await?;
    songs::delete(&pool, event.id, musica.id).await?;

    Ok(Json(json!({
        "message": "Song removed successfully",
    })))
}

/// POST /eventos/:eventId/musicas/reorder - bulk positional update
pub async fn reorder(
    Extension(auth): Extension<AuthBand>,
    Path(event_id): Path<i64>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let event = hierarchy::owned_event(&pool, &auth.context(), event_id).await?;

    let mut errors = FieldErrors::new();
    let entries = validate_entries(&mut errors, body.musicas);
    bail(errors)?;

    let musicas = songs::reorder(&pool, event.id, &entries).await?;

    Ok(Json(json!({
        "message": "Setlist reordered successfully",
        "musicas": musicas,
    })))
}

fn validate_entries(
    errors: &mut FieldErrors,
    musicas: Option<Vec<ReorderEntryBody>>,
) -> Vec<ReorderEntry> {
    let Some(bodies) = musicas.filter(|m| !m.is_empty()) else {
        add_error(errors, "musicas", "The musicas field is required");
        return vec![];
    };

    let mut entries = Vec::with_capacity(bodies.len());
    for (index, body) in bodies.iter().enumerate() {
        if body.id.is_none() {
            add_error(
                errors,
                &format!("musicas.{index}.id"),
                "The id field is required",
            );
        }
        match body.ordem {
            None => add_error(
                errors,
                &format!("musicas.{index}.ordem"),
                "The ordem field is required",
            ),
            Some(ordem) if ordem < 0 => add_error(
                errors,
                &format!("musicas.{index}.ordem"),
                "The ordem must be at least 0",
            ),
            Some(_) => {}
        }
        if let (Some(id), Some(ordem)) = (body.id, body.ordem) {
            if ordem >= 0 {
                entries.push(ReorderEntry { id, ordem });
            }
        }
    }
    entries
}
