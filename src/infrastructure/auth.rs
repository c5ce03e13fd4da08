use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::utils::ids::nanoid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
    pub iat: usize,
    /// Nonce so two tokens minted in the same second differ
    pub jti: String,
}

/// Signs and verifies access and refresh tokens
#[derive(Clone)]
pub struct TokenManager {
    access_secret: String,
    refresh_secret: String,
    access_token_age: Duration,
}

impl TokenManager {
    pub fn new(access_secret: &str, refresh_secret: &str, access_token_age: Duration) -> Self {
        Self {
            access_secret: access_secret.to_string(),
            refresh_secret: refresh_secret.to_string(),
            access_token_age,
        }
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String, DomainError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_owned(),
            exp: Some(now + self.access_token_age.as_secs() as usize),
            iat: now,
            jti: nanoid(12),
        };
        sign(&claims, &self.access_secret)
    }

    /// Refresh tokens do not expire; they stay valid while persisted
    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, DomainError> {
        let claims = Claims {
            sub: user_id.to_owned(),
            exp: None,
            iat: Utc::now().timestamp() as usize,
            jti: nanoid(12),
        };
        sign(&claims, &self.refresh_secret)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| DomainError::Unauthorized("Invalid or expired token".to_string()))
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| DomainError::invariant("Invalid refresh token"))
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, DomainError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Authenticated caller extracted from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = DomainError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| DomainError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            DomainError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.tokens.verify_access_token(token)?;
        Ok(AuthUser { id: claims.sub })
    }
}
