//! Album CRUD and likes handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::DATA_SOURCE_HEADER;
use crate::api::error::{Payload, require_non_empty};
use crate::domain::{AlbumInput, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AuthUser;

pub async fn create_album(
    State(state): State<AppState>,
    Payload(payload): Payload<AlbumInput>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("name", &payload.name)?;
    let album_id = state.albums.create_album(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "albumId": album_id }
        })),
    ))
}

pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let album = state.albums.get_album(&id).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "album": album }
    })))
}

pub async fn update_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload<AlbumInput>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("name", &payload.name)?;
    state.albums.update_album(&id, payload).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Album updated"
    })))
}

pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    state.albums.delete_album(&id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Album deleted"
    })))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let outcome = state.albums.toggle_like(&id, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": outcome.message()
        })),
    ))
}

pub async fn get_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    let likes = state.albums.number_of_likes(&id).await?;

    let mut response = Json(json!({
        "status": "success",
        "data": { "likes": likes.value }
    }))
    .into_response();

    if likes.from_cache() {
        response
            .headers_mut()
            .insert(DATA_SOURCE_HEADER, HeaderValue::from_static("cache"));
    }
    Ok(response)
}
