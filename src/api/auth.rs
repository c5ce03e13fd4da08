//! Login, token refresh and logout

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{Payload, require_non_empty};
use crate::domain::DomainError;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<impl IntoResponse, DomainError> {
    tracing::info!("Login attempt for user: {}", payload.username);
    require_non_empty("username", &payload.username)?;
    require_non_empty("password", &payload.password)?;

    let pair = state.users.login(&payload.username, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Authentication added",
            "data": {
                "accessToken": pair.access_token,
                "refreshToken": pair.refresh_token
            }
        })),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("refreshToken", &payload.refresh_token)?;
    let access_token = state.users.refresh(&payload.refresh_token).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Access token refreshed",
        "data": { "accessToken": access_token }
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("refreshToken", &payload.refresh_token)?;
    state.users.logout(&payload.refresh_token).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Refresh token deleted"
    })))
}
