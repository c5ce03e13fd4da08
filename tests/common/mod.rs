#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use openmusic::config::Config;
use openmusic::db;
use openmusic::infrastructure::AppState;
use openmusic::infrastructure::broker::DatabaseBroker;
use openmusic::infrastructure::cache::MemoryCacheStore;
use openmusic::server;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub broker: Arc<DatabaseBroker>,
    pub cache: Arc<MemoryCacheStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn from_cache(&self) -> bool {
        self.headers
            .get("x-data-source")
            .is_some_and(|v| v == "cache")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");

        let config = Config::from_env();
        let broker = Arc::new(DatabaseBroker::new(db.clone(), Duration::from_secs(60)));
        let cache = Arc::new(MemoryCacheStore::new());

        let state = AppState::new(db.clone(), cache.clone(), broker.clone(), &config);
        let router = server::build_router(state, &[]);

        Self {
            router,
            db,
            broker,
            cache,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register a user and log in; returns (user id, access token)
    pub async fn signup(&self, username: &str) -> (String, String) {
        let res = self
            .request(
                "POST",
                "/users",
                None,
                Some(json!({
                    "username": username,
                    "password": "secret",
                    "fullname": format!("{} fullname", username)
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        let user_id = res.body["data"]["userId"].as_str().unwrap().to_string();

        let res = self
            .request(
                "POST",
                "/authentications",
                None,
                Some(json!({ "username": username, "password": "secret" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        let token = res.body["data"]["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        (user_id, token)
    }

    pub async fn create_song(&self, title: &str) -> String {
        let res = self
            .request(
                "POST",
                "/songs",
                None,
                Some(json!({
                    "title": title,
                    "year": 2005,
                    "genre": "Rock",
                    "performer": "Coldplay"
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        res.body["data"]["songId"].as_str().unwrap().to_string()
    }

    pub async fn create_playlist(&self, token: &str, name: &str) -> String {
        let res = self
            .request("POST", "/playlists", Some(token), Some(json!({ "name": name })))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        res.body["data"]["playlistId"].as_str().unwrap().to_string()
    }
}
