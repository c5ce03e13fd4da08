//! Playlist handlers. Every route here requires a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::DATA_SOURCE_HEADER;
use crate::api::error::{Payload, require_non_empty};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongRequest {
    pub song_id: String,
}

pub async fn create_playlist(
    State(state): State<AppState>,
    user: AuthUser,
    Payload(payload): Payload<CreatePlaylistRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("name", &payload.name)?;
    let playlist_id = state.playlists.create_playlist(&payload.name, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "playlistId": playlist_id }
        })),
    ))
}

pub async fn list_playlists(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    let playlists = state.playlists.list_playlists(&user.id).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "playlists": playlists }
    })))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    state.playlists.delete_playlist(&id, &user.id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Playlist deleted"
    })))
}

pub async fn add_song(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Payload(payload): Payload<PlaylistSongRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("songId", &payload.song_id)?;
    state.playlists.add_song(&id, &payload.song_id, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Song added to playlist"
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/playlists/{id}/songs",
    params(("id" = String, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Playlist with its songs; X-Data-Source: cache on a cache hit"),
        (status = 403, description = "Caller is neither owner nor collaborator"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn get_songs(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    let playlist = state.playlists.get_playlist_with_songs(&id, &user.id).await?;

    let mut response = Json(json!({
        "status": "success",
        "data": { "playlist": playlist.value }
    }))
    .into_response();

    if playlist.from_cache() {
        response
            .headers_mut()
            .insert(DATA_SOURCE_HEADER, HeaderValue::from_static("cache"));
    }
    Ok(response)
}

pub async fn delete_song(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Payload(payload): Payload<PlaylistSongRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("songId", &payload.song_id)?;
    state.playlists.delete_song(&id, &payload.song_id, &user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Song removed from playlist"
    })))
}

pub async fn get_activities(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let activities = state.playlists.activities(&id, &user.id).await?;
    Ok(Json(json!({
        "status": "success",
        "data": activities
    })))
}
