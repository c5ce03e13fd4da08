//! SeaORM implementation of CollaborationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::{CollaborationRepository, DomainError};
use crate::models::collaboration::{ActiveModel, Column, Entity as CollaborationEntity};
use crate::utils::ids::prefixed_id;

pub struct SeaOrmCollaborationRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollaborationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CollaborationRepository for SeaOrmCollaborationRepository {
    async fn create(&self, playlist_id: &str, user_id: &str) -> Result<String, DomainError> {
        let id = prefixed_id("collab", 16);

        ActiveModel {
            id: Set(id.clone()),
            playlist_id: Set(playlist_id.to_string()),
            user_id: Set(user_id.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            tracing::warn!("Collaboration insert rejected for {}: {}", playlist_id, e);
            DomainError::invariant("Failed to add collaboration")
        })?;

        Ok(id)
    }

    async fn delete(&self, playlist_id: &str, user_id: &str) -> Result<(), DomainError> {
        let result = CollaborationEntity::delete_many()
            .filter(Column::PlaylistId.eq(playlist_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(
                "Failed to delete, collaboration not found",
            ));
        }
        Ok(())
    }

    async fn exists(&self, playlist_id: &str, user_id: &str) -> Result<bool, DomainError> {
        let count = CollaborationEntity::find()
            .filter(Column::PlaylistId.eq(playlist_id))
            .filter(Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
