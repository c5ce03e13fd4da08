//! Song CRUD handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::error::{Payload, require_non_empty};
use crate::domain::{DomainError, SongFilter, SongInput};
use crate::infrastructure::AppState;

fn validate(input: &SongInput) -> Result<(), DomainError> {
    require_non_empty("title", &input.title)?;
    require_non_empty("genre", &input.genre)?;
    require_non_empty("performer", &input.performer)
}

pub async fn create_song(
    State(state): State<AppState>,
    Payload(payload): Payload<SongInput>,
) -> Result<impl IntoResponse, DomainError> {
    validate(&payload)?;
    let song_id = state.songs.create_song(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "songId": song_id }
        })),
    ))
}

pub async fn list_songs(
    State(state): State<AppState>,
    Query(filter): Query<SongFilter>,
) -> Result<impl IntoResponse, DomainError> {
    let songs = state.songs.list_songs(filter).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "songs": songs }
    })))
}

pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let song = state.songs.get_song(&id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "song": song }
    })))
}

pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload<SongInput>,
) -> Result<impl IntoResponse, DomainError> {
    validate(&payload)?;
    state.songs.update_song(&id, payload).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Song updated"
    })))
}

pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    state.songs.delete_song(&id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Song deleted"
    })))
}
