//! Services Layer
//!
//! Business logic between the HTTP handlers and the repositories: access
//! checks, cache-aside reads, activity logging and the export pipeline.

pub mod access_control;
pub mod album_service;
pub mod cache_aside;
pub mod collaboration_service;
pub mod export_gateway;
pub mod export_worker;
pub mod playlist_service;
pub mod song_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export for convenience
pub use access_control::{Access, AccessControl};
pub use album_service::{AlbumService, LikeToggle};
pub use cache_aside::{CacheAside, DataSource, Sourced};
pub use collaboration_service::CollaborationService;
pub use export_gateway::{ExportGateway, ExportRequest};
pub use export_worker::{ExportOutcome, ExportStage, ExportWorker, ExportedPlaylist};
pub use playlist_service::{PlaylistActivities, PlaylistService, PlaylistWithSongs};
pub use song_service::SongService;
pub use user_service::{TokenPair, UserService};
