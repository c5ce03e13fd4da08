//! Repository implementations using SeaORM

pub mod album_repository;
pub mod collaboration_repository;
pub mod playlist_repository;
pub mod song_repository;
pub mod user_repository;

pub use album_repository::SeaOrmAlbumRepository;
pub use collaboration_repository::SeaOrmCollaborationRepository;
pub use playlist_repository::SeaOrmPlaylistRepository;
pub use song_repository::SeaOrmSongRepository;
pub use user_repository::{SeaOrmAuthenticationRepository, SeaOrmUserRepository};
