//! Owner-managed playlist collaborators

use std::sync::Arc;

use crate::domain::{CollaborationRepository, DomainError, UserRepository};
use crate::services::access_control::AccessControl;

#[derive(Clone)]
pub struct CollaborationService {
    collaborations: Arc<dyn CollaborationRepository>,
    users: Arc<dyn UserRepository>,
    access: AccessControl,
}

impl CollaborationService {
    pub fn new(
        collaborations: Arc<dyn CollaborationRepository>,
        users: Arc<dyn UserRepository>,
        access: AccessControl,
    ) -> Self {
        Self {
            collaborations,
            users,
            access,
        }
    }

    pub async fn add(
        &self,
        playlist_id: &str,
        owner_id: &str,
        user_id: &str,
    ) -> Result<String, DomainError> {
        self.access.verify_owner(playlist_id, owner_id).await?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User not found"));
        }

        self.collaborations.create(playlist_id, user_id).await
    }

    pub async fn remove(
        &self,
        playlist_id: &str,
        owner_id: &str,
        user_id: &str,
    ) -> Result<(), DomainError> {
        self.access.verify_owner(playlist_id, owner_id).await?;
        self.collaborations.delete(playlist_id, user_id).await
    }
}
