//! DomainError to HTTP response mapping and the JSON body extractor

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::DomainError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Invariant(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            return (
                status,
                Json(json!({ "status": "fail", "message": self.message() })),
            )
                .into_response();
        }

        tracing::error!("{}", self);
        let message = match self {
            DomainError::Transient(_) => "Service temporarily unavailable, please retry",
            _ => "Sorry, there was a failure on our server.",
        };
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::Validation(rejection.body_text())
    }
}

/// `Json` whose rejections come back in the API's error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DomainError))]
pub struct Payload<T>(pub T);

pub fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "\"{}\" is not allowed to be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DomainError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            DomainError::invariant("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::Transient("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = DomainError::Database("disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "error");
        assert!(!body["message"].as_str().unwrap().contains("disk"));
    }

    #[test]
    fn test_blank_field_is_rejected() {
        assert!(require_non_empty("name", "  ").is_err());
        assert!(require_non_empty("name", "Favorites").is_ok());
    }
}
