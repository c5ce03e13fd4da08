//! Asynchronous playlist export

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::Payload;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlaylistRequest {
    pub target_email: String,
}

#[utoipa::path(
    post,
    path = "/export/playlists/{playlistId}",
    params(("playlistId" = String, Path, description = "Playlist to export")),
    responses(
        (status = 201, description = "Export request queued"),
        (status = 400, description = "targetEmail is not a valid address"),
        (status = 403, description = "Caller does not own the playlist"),
        (status = 404, description = "Playlist not found"),
        (status = 503, description = "Broker unavailable")
    )
)]
pub async fn export_playlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(playlist_id): Path<String>,
    Payload(payload): Payload<ExportPlaylistRequest>,
) -> Result<impl IntoResponse, DomainError> {
    state
        .exports
        .request_export(&playlist_id, &user.id, &payload.target_email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Your request is being processed"
        })),
    ))
}
