//! Shared fixtures for service tests

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    AlbumInput, AlbumRepository, CacheLookup, CacheStore, CollaborationRepository, DomainError,
    NewUser, PlaylistRepository, SongInput, SongRepository, UserRepository,
};
use crate::infrastructure::db::init_db;
use crate::infrastructure::{
    SeaOrmAlbumRepository, SeaOrmCollaborationRepository, SeaOrmPlaylistRepository,
    SeaOrmSongRepository, SeaOrmUserRepository,
};

pub struct Fixture {
    pub db: DatabaseConnection,
    pub users: Arc<dyn UserRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub albums: Arc<dyn AlbumRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub collaborations: Arc<dyn CollaborationRepository>,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = init_db("sqlite::memory:").await.unwrap();
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            songs: Arc::new(SeaOrmSongRepository::new(db.clone())),
            albums: Arc::new(SeaOrmAlbumRepository::new(db.clone())),
            playlists: Arc::new(SeaOrmPlaylistRepository::new(db.clone())),
            collaborations: Arc::new(SeaOrmCollaborationRepository::new(db.clone())),
            db,
        }
    }

    pub async fn user(&self, username: &str) -> String {
        self.users
            .create(NewUser {
                username: username.to_string(),
                password_hash: "x".to_string(),
                fullname: username.to_uppercase(),
            })
            .await
            .unwrap()
    }

    pub async fn song(&self, title: &str) -> String {
        self.songs
            .create(SongInput {
                title: title.to_string(),
                year: 2008,
                genre: "Indie".to_string(),
                performer: "Coldplay".to_string(),
                duration: Some(240),
                album_id: None,
            })
            .await
            .unwrap()
    }

    pub async fn album(&self, name: &str) -> String {
        self.albums
            .create(AlbumInput {
                name: name.to_string(),
                year: 2008,
            })
            .await
            .unwrap()
    }
}

/// Cache that refuses every call, as an unreachable Redis would
pub struct DownCache;

#[async_trait]
impl CacheStore for DownCache {
    async fn get(&self, _key: &str) -> Result<CacheLookup, DomainError> {
        Err(DomainError::Transient("connection refused".into()))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), DomainError> {
        Err(DomainError::Transient("connection refused".into()))
    }
    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Transient("connection refused".into()))
    }
}
