//! SeaORM implementation of AlbumRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::domain::{Album, AlbumInput, AlbumRepository, DomainError};
use crate::infrastructure::repositories::song_repository::delete_songs;
use crate::models::album::{ActiveModel, Column, Entity as AlbumEntity};
use crate::models::song::{self, Entity as SongEntity};
use crate::models::user_album_like::{
    self, ActiveModel as LikeActiveModel, Entity as LikeEntity,
};
use crate::utils::ids::{nanoid, prefixed_id};

pub struct SeaOrmAlbumRepository {
    db: DatabaseConnection,
}

impl SeaOrmAlbumRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlbumRepository for SeaOrmAlbumRepository {
    async fn create(&self, input: AlbumInput) -> Result<String, DomainError> {
        let id = prefixed_id("album", 14);

        ActiveModel {
            id: Set(id.clone()),
            name: Set(input.name),
            year: Set(input.year),
        }
        .insert(&self.db)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Album>, DomainError> {
        let album = AlbumEntity::find_by_id(id).one(&self.db).await?;

        Ok(album.map(|a| Album {
            id: a.id,
            name: a.name,
            year: a.year,
            songs: Vec::new(),
        }))
    }

    async fn update(&self, id: &str, input: AlbumInput) -> Result<(), DomainError> {
        let result = AlbumEntity::update_many()
            .col_expr(Column::Name, Expr::value(input.name))
            .col_expr(Column::Year, Expr::value(input.year))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Failed to update, album not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let song_ids: Vec<String> = SongEntity::find()
            .filter(song::Column::AlbumId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        delete_songs(&txn, &song_ids).await?;

        LikeEntity::delete_many()
            .filter(user_album_like::Column::AlbumId.eq(id))
            .exec(&txn)
            .await?;

        let result = AlbumEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::not_found("Failed to delete, album not found"));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn add_like(&self, album_id: &str, user_id: &str) -> Result<String, DomainError> {
        let id = nanoid(20);

        LikeActiveModel {
            id: Set(id.clone()),
            user_id: Set(user_id.to_string()),
            album_id: Set(album_id.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            tracing::warn!("Like insert rejected for album {}: {}", album_id, e);
            DomainError::invariant("Failed to like album")
        })?;

        Ok(id)
    }

    async fn remove_like(&self, album_id: &str, user_id: &str) -> Result<(), DomainError> {
        let result = LikeEntity::delete_many()
            .filter(user_album_like::Column::AlbumId.eq(album_id))
            .filter(user_album_like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::invariant("Failed to unlike album"));
        }
        Ok(())
    }

    async fn has_liked(&self, album_id: &str, user_id: &str) -> Result<bool, DomainError> {
        let count = LikeEntity::find()
            .filter(user_album_like::Column::AlbumId.eq(album_id))
            .filter(user_album_like::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn count_likes(&self, album_id: &str) -> Result<u64, DomainError> {
        let count = LikeEntity::find()
            .filter(user_album_like::Column::AlbumId.eq(album_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
