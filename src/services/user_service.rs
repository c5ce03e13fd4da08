//! Registration, login and token rotation

use std::sync::Arc;

use crate::domain::{AuthenticationRepository, DomainError, NewUser, User, UserRepository};
use crate::infrastructure::auth::{TokenManager, hash_password, verify_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    authentications: Arc<dyn AuthenticationRepository>,
    tokens: TokenManager,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        authentications: Arc<dyn AuthenticationRepository>,
        tokens: TokenManager,
    ) -> Self {
        Self {
            users,
            authentications,
            tokens,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        fullname: &str,
    ) -> Result<String, DomainError> {
        if self.users.username_exists(username).await? {
            return Err(DomainError::invariant(
                "Failed to add user. Username already used.",
            ));
        }

        let password_hash = hash_password(password).map_err(DomainError::Internal)?;
        let id = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                fullname: fullname.to_string(),
            })
            .await?;

        tracing::info!("User {} registered as {}", username, id);
        Ok(id)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    pub async fn search(&self, username: &str) -> Result<Vec<User>, DomainError> {
        self.users.search(username).await
    }

    /// Verify credentials and persist a fresh refresh token
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, DomainError> {
        let invalid = || DomainError::Unauthorized("The credentials you provided are wrong".to_string());

        let Some(credential) = self.users.find_credential(username).await? else {
            tracing::warn!("Login for unknown user {}", username);
            return Err(invalid());
        };

        match verify_password(password, &credential.password_hash) {
            Ok(true) => {}
            _ => {
                tracing::warn!("Password verification failed for {}", username);
                return Err(invalid());
            }
        }

        let pair = TokenPair {
            access_token: self.tokens.generate_access_token(&credential.id)?,
            refresh_token: self.tokens.generate_refresh_token(&credential.id)?,
        };
        self.authentications.add_refresh_token(&pair.refresh_token).await?;
        Ok(pair)
    }

    /// New access token for a refresh token that is both valid and persisted
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError> {
        self.ensure_persisted(refresh_token).await?;
        let claims = self.tokens.verify_refresh_token(refresh_token)?;
        self.tokens.generate_access_token(&claims.sub)
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<(), DomainError> {
        self.ensure_persisted(refresh_token).await?;
        self.authentications.delete_refresh_token(refresh_token).await
    }

    async fn ensure_persisted(&self, refresh_token: &str) -> Result<(), DomainError> {
        if !self.authentications.refresh_token_exists(refresh_token).await? {
            return Err(DomainError::invariant("Invalid refresh token"));
        }
        Ok(())
    }
}
