//! SeaORM implementation of SongRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{DomainError, Song, SongFilter, SongInput, SongRepository, SongSummary};
use crate::models::playlist_song::{self, Entity as PlaylistSongEntity};
use crate::models::playlist_song_activity::{self, Entity as ActivityEntity};
use crate::models::song::{ActiveModel, Column, Entity as SongEntity};
use crate::utils::ids::prefixed_id;

/// SeaORM-based implementation of SongRepository
pub struct SeaOrmSongRepository {
    db: DatabaseConnection,
}

impl SeaOrmSongRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn lower_like(column: Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

/// Delete songs after their playlist links and activities, returning how
/// many song rows went away
pub(crate) async fn delete_songs<C: ConnectionTrait>(
    conn: &C,
    song_ids: &[String],
) -> Result<u64, DbErr> {
    if song_ids.is_empty() {
        return Ok(0);
    }

    PlaylistSongEntity::delete_many()
        .filter(playlist_song::Column::SongId.is_in(song_ids.iter().cloned()))
        .exec(conn)
        .await?;
    ActivityEntity::delete_many()
        .filter(playlist_song_activity::Column::SongId.is_in(song_ids.iter().cloned()))
        .exec(conn)
        .await?;

    let result = SongEntity::delete_many()
        .filter(Column::Id.is_in(song_ids.iter().cloned()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[async_trait]
impl SongRepository for SeaOrmSongRepository {
    async fn create(&self, input: SongInput) -> Result<String, DomainError> {
        let id = prefixed_id("song", 15);

        let new_song = ActiveModel {
            id: Set(id.clone()),
            album_id: Set(input.album_id),
            title: Set(input.title),
            year: Set(input.year),
            genre: Set(input.genre),
            performer: Set(input.performer),
            duration: Set(Some(input.duration.unwrap_or(0))),
        };

        new_song.insert(&self.db).await?;
        Ok(id)
    }

    async fn find_all(&self, filter: SongFilter) -> Result<Vec<SongSummary>, DomainError> {
        let mut query = SongEntity::find();

        if let Some(title) = &filter.title
            && !title.is_empty()
        {
            query = query.filter(lower_like(Column::Title, title));
        }

        if let Some(performer) = &filter.performer
            && !performer.is_empty()
        {
            query = query.filter(lower_like(Column::Performer, performer));
        }

        let songs = query.order_by_asc(Column::Title).all(&self.db).await?;
        Ok(songs.into_iter().map(SongSummary::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Song>, DomainError> {
        let song = SongEntity::find_by_id(id).one(&self.db).await?;
        Ok(song.map(Song::from))
    }

    async fn find_by_album(&self, album_id: &str) -> Result<Vec<Song>, DomainError> {
        let songs = SongEntity::find()
            .filter(Column::AlbumId.eq(album_id))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;
        Ok(songs.into_iter().map(Song::from).collect())
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let count = SongEntity::find()
            .filter(Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn update(&self, id: &str, input: SongInput) -> Result<(), DomainError> {
        let result = SongEntity::update_many()
            .col_expr(Column::Title, Expr::value(input.title))
            .col_expr(Column::Year, Expr::value(input.year))
            .col_expr(Column::Genre, Expr::value(input.genre))
            .col_expr(Column::Performer, Expr::value(input.performer))
            .col_expr(Column::Duration, Expr::value(input.duration.unwrap_or(0)))
            .col_expr(Column::AlbumId, Expr::value(input.album_id))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Failed to update, song not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if delete_songs(&txn, &[id.to_string()]).await? == 0 {
            txn.rollback().await?;
            return Err(DomainError::not_found("Failed to delete, song not found"));
        }

        txn.commit().await?;
        Ok(())
    }
}
