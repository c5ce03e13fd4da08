mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_playlist_songs_are_cached_until_changed() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("dicoding").await;
    let yellow = app.create_song("Yellow").await;
    let clocks = app.create_song("Clocks").await;
    let playlist = app.create_playlist(&token, "Coldplay hits").await;
    let songs_uri = format!("/playlists/{}/songs", playlist);

    let res = app
        .request("POST", &songs_uri, Some(&token), Some(json!({ "songId": yellow })))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let first = app.request("GET", &songs_uri, Some(&token), None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(!first.from_cache());
    assert_eq!(first.body["data"]["playlist"]["username"], "dicoding");

    let second = app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(second.from_cache());
    assert_eq!(first.body, second.body);

    let res = app
        .request("POST", &songs_uri, Some(&token), Some(json!({ "songId": clocks })))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let third = app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(!third.from_cache());
    let songs = third.body["data"]["playlist"]["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 2);

    let res = app
        .request("DELETE", &songs_uri, Some(&token), Some(json!({ "songId": yellow })))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let fourth = app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(!fourth.from_cache());
    assert_eq!(fourth.body["data"]["playlist"]["songs"][0]["title"], "Clocks");

    let activities = app
        .request("GET", &format!("/playlists/{}/activities", playlist), Some(&token), None)
        .await;
    assert_eq!(activities.status, StatusCode::OK);
    assert_eq!(activities.body["data"]["playlistId"], playlist.as_str());
    let actions: Vec<_> = activities.body["data"]["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(actions, vec!["add", "add", "delete"]);
}

#[tokio::test]
async fn test_access_rules() {
    let app = TestApp::new().await;
    let (_, owner) = app.signup("owner").await;
    let (guest_id, guest) = app.signup("guest").await;
    let (_, stranger) = app.signup("stranger").await;
    let song = app.create_song("Fix You").await;
    let playlist = app.create_playlist(&owner, "Private").await;
    let songs_uri = format!("/playlists/{}/songs", playlist);

    let res = app.request("GET", &songs_uri, None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.request("GET", &songs_uri, Some(&stranger), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["status"], "fail");

    // Absence is reported before ownership
    let res = app
        .request("GET", "/playlists/playlist-nothere123/songs", Some(&stranger), None)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request(
            "POST",
            "/collaborations",
            Some(&owner),
            Some(json!({ "playlistId": playlist, "userId": guest_id })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body["data"]["collaborationId"].is_string());

    let res = app
        .request("POST", &songs_uri, Some(&guest), Some(json!({ "songId": song })))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app.request("GET", "/playlists", Some(&guest), None).await;
    assert_eq!(res.body["data"]["playlists"][0]["username"], "owner");

    let res = app
        .request("DELETE", &format!("/playlists/{}", playlist), Some(&guest), None)
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "DELETE",
            "/collaborations",
            Some(&owner),
            Some(json!({ "playlistId": playlist, "userId": guest_id })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request("GET", &songs_uri, Some(&guest), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request("DELETE", &format!("/playlists/{}", playlist), Some(&owner), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request("GET", &songs_uri, Some(&owner), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_payloads_are_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("dicoding").await;

    let res = app
        .request("POST", "/playlists", Some(&token), Some(json!({ "name": "" })))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["status"], "fail");

    let res = app
        .request("POST", "/playlists", Some(&token), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let playlist = app.create_playlist(&token, "Favorites").await;
    let res = app
        .request(
            "POST",
            &format!("/playlists/{}/songs", playlist),
            Some(&token),
            Some(json!({ "songId": "song-doesnotexist1" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_catalog_writes_reach_cached_playlists() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("dicoding").await;
    let song = app.create_song("Speed of Sound").await;
    let playlist = app.create_playlist(&token, "Drive").await;
    let songs_uri = format!("/playlists/{}/songs", playlist);

    app.request("POST", &songs_uri, Some(&token), Some(json!({ "songId": song })))
        .await;
    app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(app.request("GET", &songs_uri, Some(&token), None).await.from_cache());

    let res = app
        .request(
            "PUT",
            &format!("/songs/{}", song),
            None,
            Some(json!({
                "title": "Speed of Sound (Live)",
                "year": 2005,
                "genre": "Rock",
                "performer": "Coldplay"
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(!res.from_cache());
    assert_eq!(
        res.body["data"]["playlist"]["songs"][0]["title"],
        "Speed of Sound (Live)"
    );

    let res = app
        .request("DELETE", &format!("/songs/{}", song), None, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request("GET", &songs_uri, Some(&token), None).await;
    assert!(!res.from_cache());
    assert!(res.body["data"]["playlist"]["songs"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_song_link_edge_cases() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("dicoding").await;
    let song = app.create_song("Trouble").await;
    let playlist = app.create_playlist(&token, "Parachutes").await;
    let songs_uri = format!("/playlists/{}/songs", playlist);

    let res = app
        .request(
            "DELETE",
            &songs_uri,
            Some(&token),
            Some(json!({ "songId": "song-doesnotexist1" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request("POST", &songs_uri, Some(&token), Some(json!({ "songId": song })))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app
        .request("POST", &songs_uri, Some(&token), Some(json!({ "songId": song })))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.request("GET", &songs_uri, Some(&token), None).await;
    assert_eq!(
        res.body["data"]["playlist"]["songs"].as_array().unwrap().len(),
        1
    );
}
