pub mod album;
pub mod authentication;
pub mod collaboration;
pub mod playlist;
pub mod playlist_song;
pub mod playlist_song_activity;
pub mod queue;
pub mod queue_message;
pub mod song;
pub mod user;
pub mod user_album_like;
