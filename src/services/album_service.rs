//! Albums and their likes counter

use serde::Serialize;
use std::sync::Arc;

use crate::domain::{
    Album, AlbumInput, AlbumRepository, CacheKey, DomainError, PlaylistRepository, SongRepository,
};
use crate::services::cache_aside::{CacheAside, Sourced};
use crate::services::song_service::invalidate_playlists;

/// What a like toggle ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn message(&self) -> &'static str {
        match self {
            LikeToggle::Liked => "Successfully liked album",
            LikeToggle::Unliked => "Successfully unliked album",
        }
    }
}

#[derive(Clone)]
pub struct AlbumService {
    albums: Arc<dyn AlbumRepository>,
    songs: Arc<dyn SongRepository>,
    playlists: Arc<dyn PlaylistRepository>,
    cache: CacheAside,
}

impl AlbumService {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        songs: Arc<dyn SongRepository>,
        playlists: Arc<dyn PlaylistRepository>,
        cache: CacheAside,
    ) -> Self {
        Self {
            albums,
            songs,
            playlists,
            cache,
        }
    }

    pub async fn create_album(&self, input: AlbumInput) -> Result<String, DomainError> {
        self.albums.create(input).await
    }

    pub async fn update_album(&self, album_id: &str, input: AlbumInput) -> Result<(), DomainError> {
        self.albums.update(album_id, input).await
    }

    /// Album header plus the songs attached to it
    pub async fn get_album(&self, album_id: &str) -> Result<Album, DomainError> {
        let mut album = self.albums.find_by_id(album_id).await?.ok_or_else(album_not_found)?;
        album.songs = self.songs.find_by_album(album_id).await?;
        Ok(album)
    }

    /// Deleting an album takes its songs with it, so playlists linking any
    /// of them lose their cached views as well as the likes counter.
    pub async fn delete_album(&self, album_id: &str) -> Result<(), DomainError> {
        let song_ids: Vec<String> = self
            .songs
            .find_by_album(album_id)
            .await?
            .into_iter()
            .map(|song| song.id)
            .collect();
        let affected = self.playlists.find_ids_by_songs(&song_ids).await?;

        self.albums.delete(album_id).await?;

        self.cache.invalidate(&CacheKey::album_likes(album_id)).await;
        invalidate_playlists(&self.cache, &affected).await;
        Ok(())
    }

    /// Flip the caller's like on an album, then drop the cached count
    pub async fn toggle_like(&self, album_id: &str, user_id: &str) -> Result<LikeToggle, DomainError> {
        self.ensure_exists(album_id).await?;

        let outcome = if self.albums.has_liked(album_id, user_id).await? {
            self.albums.remove_like(album_id, user_id).await?;
            LikeToggle::Unliked
        } else {
            self.albums.add_like(album_id, user_id).await?;
            LikeToggle::Liked
        };

        self.cache.invalidate(&CacheKey::album_likes(album_id)).await;
        tracing::debug!("Album {} {:?} by {}", album_id, outcome, user_id);
        Ok(outcome)
    }

    pub async fn like(&self, album_id: &str, user_id: &str) -> Result<(), DomainError> {
        self.ensure_exists(album_id).await?;
        self.albums.add_like(album_id, user_id).await?;
        self.cache.invalidate(&CacheKey::album_likes(album_id)).await;
        Ok(())
    }

    pub async fn unlike(&self, album_id: &str, user_id: &str) -> Result<(), DomainError> {
        self.albums.remove_like(album_id, user_id).await?;
        self.cache.invalidate(&CacheKey::album_likes(album_id)).await;
        Ok(())
    }

    /// Cached like count, stored as a decimal string under `album_likes:<id>`
    pub async fn number_of_likes(&self, album_id: &str) -> Result<Sourced<u64>, DomainError> {
        let albums = self.albums.clone();
        self.cache
            .read_through(&CacheKey::album_likes(album_id), || async move {
                if albums.find_by_id(album_id).await?.is_none() {
                    return Err(album_not_found());
                }
                albums.count_likes(album_id).await
            })
            .await
    }

    async fn ensure_exists(&self, album_id: &str) -> Result<(), DomainError> {
        match self.albums.find_by_id(album_id).await? {
            Some(_) => Ok(()),
            None => Err(album_not_found()),
        }
    }
}

fn album_not_found() -> DomainError {
    DomainError::not_found("Album not found")
}
