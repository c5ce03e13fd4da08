use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{Payload, require_non_empty};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    pub playlist_id: String,
    pub user_id: String,
}

pub async fn add_collaborator(
    State(state): State<AppState>,
    user: AuthUser,
    Payload(payload): Payload<CollaborationRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("playlistId", &payload.playlist_id)?;
    require_non_empty("userId", &payload.user_id)?;

    let collaboration_id = state
        .collaborations
        .add(&payload.playlist_id, &user.id, &payload.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "collaborationId": collaboration_id }
        })),
    ))
}

pub async fn remove_collaborator(
    State(state): State<AppState>,
    user: AuthUser,
    Payload(payload): Payload<CollaborationRequest>,
) -> Result<impl IntoResponse, DomainError> {
    state
        .collaborations
        .remove(&payload.playlist_id, &user.id, &payload.user_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Collaboration deleted"
    })))
}
