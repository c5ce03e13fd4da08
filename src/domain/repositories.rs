//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Public user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

/// Input for registering a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub fullname: String,
}

/// Stored credential used by the login flow
#[derive(Debug, Clone)]
pub struct UserCredential {
    pub id: String,
    pub password_hash: String,
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return its id
    async fn create(&self, user: NewUser) -> Result<String, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;

    /// Substring search on username
    async fn search(&self, username: &str) -> Result<Vec<User>, DomainError>;

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError>;

    async fn find_credential(&self, username: &str)
    -> Result<Option<UserCredential>, DomainError>;
}

/// Repository trait for persisted refresh tokens
#[async_trait]
pub trait AuthenticationRepository: Send + Sync {
    async fn add_refresh_token(&self, token: &str) -> Result<(), DomainError>;

    async fn refresh_token_exists(&self, token: &str) -> Result<bool, DomainError>;

    async fn delete_refresh_token(&self, token: &str) -> Result<(), DomainError>;
}

/// Full song record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub performer: String,
    pub duration: Option<i32>,
    pub album_id: Option<String>,
}

/// Song as it appears inside playlists and listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub performer: String,
}

/// Input for creating or replacing a song
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub performer: String,
    pub duration: Option<i32>,
    pub album_id: Option<String>,
}

/// Filter criteria for song queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SongFilter {
    pub title: Option<String>,
    pub performer: Option<String>,
}

/// Repository trait for Song entity
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn create(&self, input: SongInput) -> Result<String, DomainError>;

    /// Case-insensitive substring match on title and performer
    async fn find_all(&self, filter: SongFilter) -> Result<Vec<SongSummary>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Song>, DomainError>;

    async fn find_by_album(&self, album_id: &str) -> Result<Vec<Song>, DomainError>;

    async fn exists(&self, id: &str) -> Result<bool, DomainError>;

    /// Fails with `NotFound` when no row was updated
    async fn update(&self, id: &str, input: SongInput) -> Result<(), DomainError>;

    /// Removes the song together with its playlist links and activities.
    /// Fails with `NotFound` when no row was deleted.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Album with its songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub songs: Vec<Song>,
}

/// Input for creating or replacing an album
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInput {
    pub name: String,
    pub year: i32,
}

/// Repository trait for Album entity and its like rows
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    async fn create(&self, input: AlbumInput) -> Result<String, DomainError>;

    /// Header only, `songs` is left empty
    async fn find_by_id(&self, id: &str) -> Result<Option<Album>, DomainError>;

    async fn update(&self, id: &str, input: AlbumInput) -> Result<(), DomainError>;

    /// Removes the album, its likes and its songs along with their playlist
    /// links and activities
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Insert a like row; this is the source of truth behind the likes counter
    async fn add_like(&self, album_id: &str, user_id: &str) -> Result<String, DomainError>;

    /// Fails with `Invariant` when the user had not liked the album
    async fn remove_like(&self, album_id: &str, user_id: &str) -> Result<(), DomainError>;

    async fn has_liked(&self, album_id: &str, user_id: &str) -> Result<bool, DomainError>;

    async fn count_likes(&self, album_id: &str) -> Result<u64, DomainError>;
}

/// Playlist row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// Playlist header joined with the owner's username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// Action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Add,
    Delete,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Delete => "delete",
        }
    }
}

/// Activity row to append
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub playlist_id: String,
    pub song_id: String,
    pub user_id: String,
    pub action: ActivityAction,
    /// RFC 3339 timestamp
    pub time: String,
}

/// Activity joined with username and song title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub username: String,
    pub title: String,
    pub action: String,
    pub time: String,
}

/// Repository trait for Playlist entity, its song links and its activity log
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn create(&self, name: &str, owner: &str) -> Result<String, DomainError>;

    /// Playlists the user owns or collaborates on
    async fn find_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>, DomainError>;

    /// Header joined with the owner's username
    async fn find_header(&self, id: &str) -> Result<Option<PlaylistSummary>, DomainError>;

    async fn find_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DomainError>;

    /// Ids of the playlists that currently link any of the given songs
    async fn find_ids_by_songs(&self, song_ids: &[String]) -> Result<Vec<String>, DomainError>;

    async fn insert_song_link(&self, playlist_id: &str, song_id: &str)
    -> Result<String, DomainError>;

    /// Fails with `Invariant` when no link was removed
    async fn delete_song_link(&self, playlist_id: &str, song_id: &str)
    -> Result<(), DomainError>;

    async fn insert_activity(&self, activity: NewActivity) -> Result<String, DomainError>;

    async fn find_activities(&self, playlist_id: &str) -> Result<Vec<ActivityEntry>, DomainError>;

    /// Removes the playlist together with its song links, activities and
    /// collaborations. Fails with `NotFound` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Repository trait for playlist collaborations
#[async_trait]
pub trait CollaborationRepository: Send + Sync {
    async fn create(&self, playlist_id: &str, user_id: &str) -> Result<String, DomainError>;

    /// Fails with `NotFound` when no collaboration was removed
    async fn delete(&self, playlist_id: &str, user_id: &str) -> Result<(), DomainError>;

    async fn exists(&self, playlist_id: &str, user_id: &str) -> Result<bool, DomainError>;
}
