//! Playlists with songs: cache-aside reads, invalidating writes
//!
//! Every mutation that can change `GET /playlists/{id}/songs` commits first
//! and only then drops `playlist:<id>`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{
    ActivityAction, ActivityEntry, CacheKey, DomainError, NewActivity, PlaylistRepository,
    PlaylistSummary, SongRepository, SongSummary,
};
use crate::services::access_control::AccessControl;
use crate::services::cache_aside::{CacheAside, Sourced};

/// Cached view of a playlist: header, owner's username, songs in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithSongs {
    pub id: String,
    pub name: String,
    pub username: String,
    pub songs: Vec<SongSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistActivities {
    pub playlist_id: String,
    pub activities: Vec<ActivityEntry>,
}

#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepository>,
    songs: Arc<dyn SongRepository>,
    access: AccessControl,
    cache: CacheAside,
}

impl PlaylistService {
    pub fn new(
        playlists: Arc<dyn PlaylistRepository>,
        songs: Arc<dyn SongRepository>,
        access: AccessControl,
        cache: CacheAside,
    ) -> Self {
        Self {
            playlists,
            songs,
            access,
            cache,
        }
    }

    pub async fn create_playlist(&self, name: &str, owner: &str) -> Result<String, DomainError> {
        let id = self.playlists.create(name, owner).await?;
        tracing::info!("Playlist {} created by {}", id, owner);
        Ok(id)
    }

    pub async fn list_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DomainError> {
        self.playlists.find_for_user(user_id).await
    }

    /// Aggregate read, without any authorization
    pub async fn playlist_with_songs(
        &self,
        playlist_id: &str,
    ) -> Result<Sourced<PlaylistWithSongs>, DomainError> {
        let playlists = self.playlists.clone();
        self.cache
            .read_through(&CacheKey::playlist(playlist_id), || async move {
                let header = playlists
                    .find_header(playlist_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Playlist not found"))?;
                let songs = playlists.find_songs(playlist_id).await?;

                Ok(PlaylistWithSongs {
                    id: header.id,
                    name: header.name,
                    username: header.username,
                    songs,
                })
            })
            .await
    }

    pub async fn get_playlist_with_songs(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Sourced<PlaylistWithSongs>, DomainError> {
        self.access.verify_access(playlist_id, user_id).await?;
        self.playlist_with_songs(playlist_id).await
    }

    /// Link a song and log the activity. If logging fails the link is
    /// removed again so the log never misses a change.
    pub async fn add_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
    ) -> Result<(), DomainError> {
        self.access.verify_access(playlist_id, user_id).await?;

        if !self.songs.exists(song_id).await? {
            return Err(DomainError::not_found("Song not found"));
        }

        self.playlists.insert_song_link(playlist_id, song_id).await?;

        if let Err(e) = self
            .record(playlist_id, song_id, user_id, ActivityAction::Add)
            .await
        {
            tracing::error!(
                "Activity log failed for add {} -> {}: {}",
                song_id,
                playlist_id,
                e
            );
            if let Err(undo) = self.playlists.delete_song_link(playlist_id, song_id).await {
                tracing::error!("Could not undo song link {} -> {}: {}", song_id, playlist_id, undo);
            }
            self.cache.invalidate(&CacheKey::playlist(playlist_id)).await;
            return Err(e);
        }

        self.cache.invalidate(&CacheKey::playlist(playlist_id)).await;
        Ok(())
    }

    pub async fn delete_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
    ) -> Result<(), DomainError> {
        self.access.verify_access(playlist_id, user_id).await?;

        if !self.songs.exists(song_id).await? {
            return Err(DomainError::not_found("Song not found"));
        }

        self.playlists.delete_song_link(playlist_id, song_id).await?;

        if let Err(e) = self
            .record(playlist_id, song_id, user_id, ActivityAction::Delete)
            .await
        {
            tracing::error!(
                "Activity log failed for delete {} -> {}: {}",
                song_id,
                playlist_id,
                e
            );
            if let Err(undo) = self.playlists.insert_song_link(playlist_id, song_id).await {
                tracing::error!("Could not restore song link {} -> {}: {}", song_id, playlist_id, undo);
            }
            self.cache.invalidate(&CacheKey::playlist(playlist_id)).await;
            return Err(e);
        }

        self.cache.invalidate(&CacheKey::playlist(playlist_id)).await;
        Ok(())
    }

    /// Owner only
    pub async fn delete_playlist(&self, playlist_id: &str, user_id: &str) -> Result<(), DomainError> {
        self.access.verify_owner(playlist_id, user_id).await?;
        self.playlists.delete(playlist_id).await?;
        self.cache.invalidate(&CacheKey::playlist(playlist_id)).await;
        tracing::info!("Playlist {} deleted", playlist_id);
        Ok(())
    }

    pub async fn activities(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<PlaylistActivities, DomainError> {
        self.access.verify_access(playlist_id, user_id).await?;
        let activities = self.playlists.find_activities(playlist_id).await?;
        Ok(PlaylistActivities {
            playlist_id: playlist_id.to_string(),
            activities,
        })
    }

    async fn record(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
        action: ActivityAction,
    ) -> Result<String, DomainError> {
        self.playlists
            .insert_activity(NewActivity {
                playlist_id: playlist_id.to_string(),
                song_id: song_id.to_string(),
                user_id: user_id.to_string(),
                action,
                time: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CacheLookup, CacheStore, DEFAULT_TTL};
    use crate::infrastructure::cache::MemoryCacheStore;
    use crate::services::cache_aside::DataSource;
    use crate::services::test_support::{DownCache, Fixture};

    fn service(fx: &Fixture, store: Arc<dyn CacheStore>) -> PlaylistService {
        let access = AccessControl::new(fx.playlists.clone(), fx.collaborations.clone());
        PlaylistService::new(
            fx.playlists.clone(),
            fx.songs.clone(),
            access,
            CacheAside::new(store, DEFAULT_TTL),
        )
    }

    async fn setup() -> (Fixture, PlaylistService, Arc<MemoryCacheStore>) {
        let fx = Fixture::new().await;
        let store = Arc::new(MemoryCacheStore::new());
        let service = service(&fx, store.clone());
        (fx, service, store)
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache_with_same_body() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let song = fx.song("Viva la Vida").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();
        service.add_song(&playlist, &song, &owner).await.unwrap();

        let first = service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        let second = service.get_playlist_with_songs(&playlist, &owner).await.unwrap();

        assert_eq!(first.source, DataSource::Source);
        assert_eq!(second.source, DataSource::Cache);
        assert_eq!(
            serde_json::to_string(&first.value).unwrap(),
            serde_json::to_string(&second.value).unwrap()
        );
        assert_eq!(second.value.username, "dicoding");
        assert_eq!(second.value.songs.len(), 1);
        assert_eq!(second.value.songs[0].title, "Viva la Vida");
    }

    #[tokio::test]
    async fn test_add_song_invalidates_cached_view() {
        let (fx, service, store) = setup().await;
        let owner = fx.user("dicoding").await;
        let first_song = fx.song("Yellow").await;
        let second_song = fx.song("Fix You").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        service.add_song(&playlist, &first_song, &owner).await.unwrap();
        service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        assert!(matches!(
            store.get(&CacheKey::playlist(&playlist)).await.unwrap(),
            CacheLookup::Hit(_)
        ));

        service.add_song(&playlist, &second_song, &owner).await.unwrap();
        assert_eq!(
            store.get(&CacheKey::playlist(&playlist)).await.unwrap(),
            CacheLookup::Miss
        );

        let view = service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        assert_eq!(view.source, DataSource::Source);
        let titles: Vec<_> = view.value.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Yellow", "Fix You"]);
    }

    #[tokio::test]
    async fn test_delete_song_invalidates_and_logs_activity() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let song = fx.song("Clocks").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        service.add_song(&playlist, &song, &owner).await.unwrap();
        service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        service.delete_song(&playlist, &song, &owner).await.unwrap();

        let view = service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        assert_eq!(view.source, DataSource::Source);
        assert!(view.value.songs.is_empty());

        let log = service.activities(&playlist, &owner).await.unwrap();
        let actions: Vec<_> = log.activities.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["add", "delete"]);
        assert_eq!(log.activities[0].username, "dicoding");
        assert_eq!(log.activities[0].title, "Clocks");
    }

    #[tokio::test]
    async fn test_deleting_absent_song_link_is_invariant_violation() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let song = fx.song("Clocks").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        let err = service.delete_song(&playlist, &song, &owner).await.unwrap_err();
        assert!(matches!(err, DomainError::Invariant(_)));
    }

    #[tokio::test]
    async fn test_unknown_song_is_not_found() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        let err = service
            .add_song(&playlist, "song-doesnotexist1", &owner)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("Song not found"));
    }

    #[tokio::test]
    async fn test_deleting_unknown_song_is_not_found() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        let err = service
            .delete_song(&playlist, "song-doesnotexist1", &owner)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("Song not found"));
        assert!(service.activities(&playlist, &owner).await.unwrap().activities.is_empty());
    }

    #[tokio::test]
    async fn test_song_is_linked_at_most_once() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("dicoding").await;
        let song = fx.song("Trouble").await;
        let playlist = service.create_playlist("Favorites", &owner).await.unwrap();

        service.add_song(&playlist, &song, &owner).await.unwrap();
        let err = service.add_song(&playlist, &song, &owner).await.unwrap_err();
        assert_eq!(err, DomainError::invariant("Failed add song to playlist"));

        assert_eq!(fx.playlists.find_songs(&playlist).await.unwrap().len(), 1);
        let log = service.activities(&playlist, &owner).await.unwrap();
        assert_eq!(log.activities.len(), 1);

        service.delete_song(&playlist, &song, &owner).await.unwrap();
        assert!(fx.playlists.find_songs(&playlist).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_stand_when_cache_is_down() {
        let fx = Fixture::new().await;
        let service = service(&fx, Arc::new(DownCache));
        let owner = fx.user("dicoding").await;
        let song = fx.song("Sparks").await;
        let playlist = service.create_playlist("Offline", &owner).await.unwrap();

        service.add_song(&playlist, &song, &owner).await.unwrap();
        let songs = fx.playlists.find_songs(&playlist).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Sparks");

        let view = service.get_playlist_with_songs(&playlist, &owner).await.unwrap();
        assert_eq!(view.source, DataSource::Source);

        service.delete_playlist(&playlist, &owner).await.unwrap();
        assert!(fx.playlists.find_by_id(&playlist).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collaborator_can_edit_but_not_delete() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("owner").await;
        let guest = fx.user("guest").await;
        let song = fx.song("Paradise").await;
        let playlist = service.create_playlist("Shared", &owner).await.unwrap();
        fx.collaborations.create(&playlist, &guest).await.unwrap();

        service.add_song(&playlist, &song, &guest).await.unwrap();
        assert_eq!(service.list_playlists(&guest).await.unwrap().len(), 1);

        let err = service.delete_playlist(&playlist, &guest).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        service.delete_playlist(&playlist, &owner).await.unwrap();
        let err = service
            .get_playlist_with_songs(&playlist, &owner)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stranger_is_forbidden() {
        let (fx, service, _) = setup().await;
        let owner = fx.user("owner").await;
        let stranger = fx.user("stranger").await;
        let playlist = service.create_playlist("Private", &owner).await.unwrap();

        let err = service
            .get_playlist_with_songs(&playlist, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
