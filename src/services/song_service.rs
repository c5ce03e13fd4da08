//! Song catalog writes that keep cached playlist views honest

use std::sync::Arc;

use crate::domain::{
    CacheKey, DomainError, PlaylistRepository, Song, SongFilter, SongInput, SongRepository,
    SongSummary,
};
use crate::services::cache_aside::CacheAside;

#[derive(Clone)]
pub struct SongService {
    songs: Arc<dyn SongRepository>,
    playlists: Arc<dyn PlaylistRepository>,
    cache: CacheAside,
}

impl SongService {
    pub fn new(
        songs: Arc<dyn SongRepository>,
        playlists: Arc<dyn PlaylistRepository>,
        cache: CacheAside,
    ) -> Self {
        Self {
            songs,
            playlists,
            cache,
        }
    }

    pub async fn create_song(&self, input: SongInput) -> Result<String, DomainError> {
        self.songs.create(input).await
    }

    pub async fn list_songs(&self, filter: SongFilter) -> Result<Vec<SongSummary>, DomainError> {
        self.songs.find_all(filter).await
    }

    pub async fn get_song(&self, song_id: &str) -> Result<Song, DomainError> {
        self.songs
            .find_by_id(song_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Song not found"))
    }

    /// Title and performer show up in playlist views, so every playlist
    /// linking the song is dropped from the cache once the update commits.
    pub async fn update_song(&self, song_id: &str, input: SongInput) -> Result<(), DomainError> {
        let affected = self.playlists.find_ids_by_songs(&[song_id.to_string()]).await?;
        self.songs.update(song_id, input).await?;
        invalidate_playlists(&self.cache, &affected).await;
        Ok(())
    }

    pub async fn delete_song(&self, song_id: &str) -> Result<(), DomainError> {
        let affected = self.playlists.find_ids_by_songs(&[song_id.to_string()]).await?;
        self.songs.delete(song_id).await?;
        invalidate_playlists(&self.cache, &affected).await;
        tracing::info!(
            "Song {} deleted, {} playlist view(s) invalidated",
            song_id,
            affected.len()
        );
        Ok(())
    }
}

pub(crate) async fn invalidate_playlists(cache: &CacheAside, playlist_ids: &[String]) {
    for id in playlist_ids {
        cache.invalidate(&CacheKey::playlist(id)).await;
    }
}
