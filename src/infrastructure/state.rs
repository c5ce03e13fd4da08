//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CacheStore, MessageBroker, PlaylistRepository, SongRepository};
use crate::infrastructure::auth::TokenManager;
use crate::infrastructure::config::Config;
use crate::infrastructure::{
    SeaOrmAlbumRepository, SeaOrmAuthenticationRepository, SeaOrmCollaborationRepository,
    SeaOrmPlaylistRepository, SeaOrmSongRepository, SeaOrmUserRepository,
};
use crate::services::{
    AccessControl, AlbumService, CacheAside, CollaborationService, ExportGateway,
    PlaylistService, SongService, UserService,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenManager,
    pub users: UserService,
    pub songs: SongService,
    pub albums: AlbumService,
    pub playlists: PlaylistService,
    pub collaborations: CollaborationService,
    pub exports: ExportGateway,
}

impl AppState {
    /// Wire repositories and services around the given cache and broker
    pub fn new(
        db: DatabaseConnection,
        cache: Arc<dyn CacheStore>,
        broker: Arc<dyn MessageBroker>,
        config: &Config,
    ) -> Self {
        let tokens = TokenManager::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            config.access_token_age,
        );

        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let authentication_repo = Arc::new(SeaOrmAuthenticationRepository::new(db.clone()));
        let song_repo: Arc<dyn SongRepository> = Arc::new(SeaOrmSongRepository::new(db.clone()));
        let album_repo = Arc::new(SeaOrmAlbumRepository::new(db.clone()));
        let playlist_repo: Arc<dyn PlaylistRepository> =
            Arc::new(SeaOrmPlaylistRepository::new(db.clone()));
        let collaboration_repo = Arc::new(SeaOrmCollaborationRepository::new(db));

        let cache = CacheAside::new(cache, config.cache_ttl);
        let access = AccessControl::new(playlist_repo.clone(), collaboration_repo.clone());

        Self {
            users: UserService::new(user_repo.clone(), authentication_repo, tokens.clone()),
            songs: SongService::new(song_repo.clone(), playlist_repo.clone(), cache.clone()),
            albums: AlbumService::new(
                album_repo,
                song_repo.clone(),
                playlist_repo.clone(),
                cache.clone(),
            ),
            playlists: PlaylistService::new(
                playlist_repo,
                song_repo.clone(),
                access.clone(),
                cache,
            ),
            collaborations: CollaborationService::new(
                collaboration_repo,
                user_repo,
                access.clone(),
            ),
            exports: ExportGateway::new(access, broker, config.export_queue.clone()),
            tokens,
        }
    }
}
