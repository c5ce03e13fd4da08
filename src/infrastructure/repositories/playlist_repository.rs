//! SeaORM implementation of PlaylistRepository

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

use crate::domain::{
    ActivityEntry, DomainError, NewActivity, Playlist, PlaylistRepository, PlaylistSummary,
    SongSummary,
};
use crate::models::collaboration::{self, Entity as CollaborationEntity};
use crate::models::playlist::{ActiveModel, Column, Entity as PlaylistEntity};
use crate::models::playlist_song::{self, Entity as PlaylistSongEntity};
use crate::models::playlist_song_activity::{self, Entity as ActivityEntity};
use crate::models::song::{self, Entity as SongEntity};
use crate::models::user::{self, Entity as UserEntity};
use crate::utils::ids::{nanoid, prefixed_id};

/// SeaORM-based implementation of PlaylistRepository
pub struct SeaOrmPlaylistRepository {
    db: DatabaseConnection,
}

impl SeaOrmPlaylistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn summary(playlist: crate::models::playlist::Model, owner: Option<user::Model>) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.id,
        name: playlist.name,
        username: owner.map(|u| u.username).unwrap_or_default(),
    }
}

#[async_trait]
impl PlaylistRepository for SeaOrmPlaylistRepository {
    async fn create(&self, name: &str, owner: &str) -> Result<String, DomainError> {
        let id = prefixed_id("playlist", 11);

        ActiveModel {
            id: Set(id.clone()),
            name: Set(name.to_string()),
            owner: Set(owner.to_string()),
        }
        .insert(&self.db)
        .await?;

        Ok(id)
    }

    async fn find_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DomainError> {
        let shared_ids: Vec<String> = CollaborationEntity::find()
            .filter(collaboration::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| c.playlist_id)
            .collect();

        let mut condition = Condition::any().add(Column::Owner.eq(user_id));
        if !shared_ids.is_empty() {
            condition = condition.add(Column::Id.is_in(shared_ids));
        }

        let playlists = PlaylistEntity::find()
            .filter(condition)
            .order_by_asc(Column::Name)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await?;

        Ok(playlists
            .into_iter()
            .map(|(playlist, owner)| summary(playlist, owner))
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>, DomainError> {
        let playlist = PlaylistEntity::find_by_id(id).one(&self.db).await?;
        Ok(playlist.map(Playlist::from))
    }

    async fn find_header(&self, id: &str) -> Result<Option<PlaylistSummary>, DomainError> {
        let found = PlaylistEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(found.map(|(playlist, owner)| summary(playlist, owner)))
    }

    async fn find_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DomainError> {
        let links = PlaylistSongEntity::find()
            .filter(playlist_song::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_song::Column::AddedAt)
            .order_by_asc(playlist_song::Column::Id)
            .find_also_related(SongEntity)
            .all(&self.db)
            .await?;

        Ok(links
            .into_iter()
            .filter_map(|(_, song)| song.map(SongSummary::from))
            .collect())
    }

    async fn find_ids_by_songs(&self, song_ids: &[String]) -> Result<Vec<String>, DomainError> {
        if song_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = PlaylistSongEntity::find()
            .filter(playlist_song::Column::SongId.is_in(song_ids.iter().cloned()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.playlist_id)
            .collect();

        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn insert_song_link(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<String, DomainError> {
        let id = nanoid(20);

        playlist_song::ActiveModel {
            id: Set(id.clone()),
            playlist_id: Set(playlist_id.to_string()),
            song_id: Set(song_id.to_string()),
            added_at: Set(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            tracing::warn!("Song link insert rejected for {}: {}", playlist_id, e);
            DomainError::invariant("Failed add song to playlist")
        })?;

        Ok(id)
    }

    async fn delete_song_link(&self, playlist_id: &str, song_id: &str) -> Result<(), DomainError> {
        let result = PlaylistSongEntity::delete_many()
            .filter(playlist_song::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_song::Column::SongId.eq(song_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::invariant(
                "Failed to delete song from playlist",
            ));
        }
        Ok(())
    }

    async fn insert_activity(&self, activity: NewActivity) -> Result<String, DomainError> {
        let id = nanoid(20);

        playlist_song_activity::ActiveModel {
            id: Set(id.clone()),
            playlist_id: Set(activity.playlist_id),
            song_id: Set(activity.song_id),
            user_id: Set(activity.user_id),
            action: Set(activity.action.as_str().to_string()),
            time: Set(activity.time),
        }
        .insert(&self.db)
        .await?;

        Ok(id)
    }

    async fn find_activities(&self, playlist_id: &str) -> Result<Vec<ActivityEntry>, DomainError> {
        let activities = ActivityEntity::find()
            .filter(playlist_song_activity::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_song_activity::Column::Time)
            .all(&self.db)
            .await?;

        if activities.is_empty() {
            return Ok(Vec::new());
        }

        // Resolve titles and usernames in two batched lookups
        let song_ids: Vec<String> = activities.iter().map(|a| a.song_id.clone()).collect();
        let user_ids: Vec<String> = activities.iter().map(|a| a.user_id.clone()).collect();

        let titles: HashMap<String, String> = SongEntity::find()
            .filter(song::Column::Id.is_in(song_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.title))
            .collect();

        let usernames: HashMap<String, String> = UserEntity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(activities
            .into_iter()
            .filter_map(|a| {
                Some(ActivityEntry {
                    username: usernames.get(&a.user_id)?.clone(),
                    title: titles.get(&a.song_id)?.clone(),
                    action: a.action,
                    time: a.time,
                })
            })
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        PlaylistSongEntity::delete_many()
            .filter(playlist_song::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;
        ActivityEntity::delete_many()
            .filter(playlist_song_activity::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;
        CollaborationEntity::delete_many()
            .filter(collaboration::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;

        let result = PlaylistEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::not_found(
                "Failed to delete playlist, playlist not found",
            ));
        }

        txn.commit().await?;
        Ok(())
    }
}
