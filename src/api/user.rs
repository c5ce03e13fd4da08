//! User registration and lookup handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{Payload, require_non_empty};
use crate::domain::DomainError;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub username: String,
}

pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<impl IntoResponse, DomainError> {
    require_non_empty("username", &payload.username)?;
    require_non_empty("password", &payload.password)?;
    require_non_empty("fullname", &payload.fullname)?;

    let user_id = state
        .users
        .register(&payload.username, &payload.password, &payload.fullname)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "userId": user_id }
        })),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let user = state.users.get_user(&id).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "user": user }
    })))
}

pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let users = state.users.search(&query.username).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "users": users }
    })))
}
