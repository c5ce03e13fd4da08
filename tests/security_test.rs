mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_login_refresh_logout_flow() {
    let app = TestApp::new().await;

    let res = app
        .request(
            "POST",
            "/users",
            None,
            Some(json!({ "username": "admin", "password": "pw", "fullname": "Admin" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app
        .request(
            "POST",
            "/users",
            None,
            Some(json!({ "username": "admin", "password": "pw", "fullname": "Other" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .request(
            "POST",
            "/authentications",
            None,
            Some(json!({ "username": "admin", "password": "wrong_password" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .request(
            "POST",
            "/authentications",
            None,
            Some(json!({ "username": "nobody", "password": "pw" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .request(
            "POST",
            "/authentications",
            None,
            Some(json!({ "username": "admin", "password": "pw" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let refresh = res.body["data"]["refreshToken"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PUT",
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let access = res.body["data"]["accessToken"].as_str().unwrap().to_string();

    let res = app.request("GET", "/playlists", Some(&access), None).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request(
            "DELETE",
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request(
            "PUT",
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = TestApp::new().await;

    let res = app.request("GET", "/playlists", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["status"], "fail");

    let res = app.request("GET", "/playlists", Some("garbage"), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.request("GET", "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["service"], "openmusic");
}
