pub mod album;
pub mod auth;
pub mod collaboration;
pub mod error;
pub mod export;
pub mod health;
pub mod playlist;
pub mod song;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

/// Set to `cache` on reads answered from the cache
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/users", post(user::register).get(user::search_users))
        .route("/users/:id", get(user::get_user))
        // Authentications
        .route(
            "/authentications",
            post(auth::login).put(auth::refresh).delete(auth::logout),
        )
        // Albums
        .route("/albums", post(album::create_album))
        .route(
            "/albums/:id",
            get(album::get_album)
                .put(album::update_album)
                .delete(album::delete_album),
        )
        .route(
            "/albums/:id/likes",
            post(album::toggle_like).get(album::get_likes),
        )
        // Songs
        .route("/songs", post(song::create_song).get(song::list_songs))
        .route(
            "/songs/:id",
            get(song::get_song)
                .put(song::update_song)
                .delete(song::delete_song),
        )
        // Playlists
        .route(
            "/playlists",
            post(playlist::create_playlist).get(playlist::list_playlists),
        )
        .route("/playlists/:id", axum::routing::delete(playlist::delete_playlist))
        .route(
            "/playlists/:id/songs",
            post(playlist::add_song)
                .get(playlist::get_songs)
                .delete(playlist::delete_song),
        )
        .route("/playlists/:id/activities", get(playlist::get_activities))
        // Collaborations
        .route(
            "/collaborations",
            post(collaboration::add_collaborator).delete(collaboration::remove_collaborator),
        )
        // Exports
        .route(
            "/export/playlists/:playlist_id",
            post(export::export_playlist),
        )
        .with_state(state)
}
