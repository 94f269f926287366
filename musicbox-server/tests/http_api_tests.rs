//! HTTP routing integration tests
//!
//! Requests go through the full router via `oneshot`; no socket is bound.

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use musicbox_common::time;
use musicbox_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "musicbox-test-boundary";

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_limit(1024 * 1024).await
    }

    async fn with_limit(max_upload_bytes: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let pool = helpers::memory_pool().await;
        let state = AppState::new(pool, dir.path().join("uploads"));
        Self {
            router: build_router(state, max_upload_bytes),
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, parse_json(&body))
    }

    async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let (status, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await;
        (status, parse_json(&body))
    }

    async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self
            .send(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, parse_json(&body))
    }

    async fn upload(&self, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (StatusCode, Value) {
        let (status, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/audio/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(multipart_body(fields, file)))
                    .unwrap(),
            )
            .await;
        (status, parse_json(&body))
    }

    /// Register a user plus one artist and album; returns their ids
    async fn seed(&self) -> (i64, i64, i64) {
        let (_, user) = self
            .post_json(
                "/api/users/register",
                json!({"username": "U1", "email": "u1@example.com"}),
            )
            .await;
        let (_, artist) = self.post_json("/api/artists", json!({"name": "Artist"})).await;
        let artist_id = artist["id"].as_i64().unwrap();
        let (_, album) = self
            .post_json(
                "/api/albums",
                json!({"title": "Album", "releaseYear": 2020, "artistId": artist_id}),
            )
            .await;
        (
            user["id"].as_i64().unwrap(),
            artist_id,
            album["id"].as_i64().unwrap(),
        )
    }
}

fn parse_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "musicbox-server");
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn test_register_and_lookup_user() {
    let app = TestApp::new().await;

    let (status, user) = app
        .post_json(
            "/api/users/register",
            json!({"username": "alice", "email": "alice@example.com"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["status"], "ACTIVE");
    assert_eq!(user["isPremium"], false);

    let (status, found) = app.get("/api/users/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], user["id"]);

    let (status, body) = app.get("/api/users/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    let payload = json!({"username": "bob", "email": "bob@example.com"});

    let (first, _) = app.post_json("/api/users/register", payload.clone()).await;
    let (second, body) = app.post_json("/api/users/register", payload).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/users/register", json!({"username": "carol", "email": "nope"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_album_requires_existing_artist() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_json("/api/albums", json!({"title": "Orphan", "artistId": 9999}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscription_flow() {
    let app = TestApp::new().await;
    let (user_id, _, _) = app.seed().await;

    let (status, premium) = app
        .get(&format!("/api/subscriptions/premium-status/{}", user_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(premium, Value::Bool(false));

    let end = time::to_db(&(time::now() + Duration::days(30)));
    let (status, subscription) = app
        .post_empty(&format!(
            "/api/subscriptions/create?userId={}&endDate={}",
            user_id, end
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["userId"], user_id);

    let (_, premium) = app
        .get(&format!("/api/subscriptions/premium-status/{}", user_id))
        .await;
    assert_eq!(premium, Value::Bool(true));

    let (status, history) = app.get(&format!("/api/subscriptions/user/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_subscription_bad_requests() {
    let app = TestApp::new().await;
    let (user_id, _, _) = app.seed().await;

    let (status, _) = app
        .post_empty(&format!("/api/subscriptions/create?userId={}", user_id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_empty(&format!(
            "/api/subscriptions/create?userId={}&endDate=next-tuesday",
            user_id
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_empty("/api/subscriptions/create?userId=9999&endDate=2030-01-01T00:00:00Z")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_then_download() {
    let app = TestApp::new().await;
    let (_, artist_id, album_id) = app.seed().await;
    let audio: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let (status, asset) = app
        .upload(
            &[
                ("title", "Upload Test"),
                ("artistId", artist_id.to_string().as_str()),
                ("albumId", album_id.to_string().as_str()),
                ("duration", "42"),
            ],
            Some(("take one.mp3", audio.as_slice())),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(asset["originalFileName"], "take one.mp3");
    assert_eq!(asset["durationSeconds"], 42);
    assert_eq!(asset["sizeBytes"], 10_000);

    let id = asset["id"].as_i64().unwrap();

    let (status, metadata) = app.get(&format!("/api/audio/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metadata, asset);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/audio/file/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/octet-stream"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.to_vec(), audio);

    let (_, listing) = app.get("/api/audio").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_unknown_artist_is_not_found() {
    let app = TestApp::new().await;
    let (_, _, album_id) = app.seed().await;

    let (status, body) = app
        .upload(
            &[
                ("title", "Nobody's Song"),
                ("artistId", "9999"),
                ("albumId", album_id.to_string().as_str()),
                ("duration", "10"),
            ],
            Some(("x.mp3", &b"abc"[..])),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("artist 9999"));
}

#[tokio::test]
async fn test_upload_missing_fields_are_bad_requests() {
    let app = TestApp::new().await;
    let (_, artist_id, album_id) = app.seed().await;
    let artist = artist_id.to_string();
    let album = album_id.to_string();

    let (status, _) = app
        .upload(
            &[("title", "No File"), ("artistId", artist.as_str()), ("albumId", album.as_str()), ("duration", "1")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .upload(
            &[("title", "Bad Duration"), ("artistId", artist.as_str()), ("albumId", album.as_str()), ("duration", "long")],
            Some(("x.mp3", &b"abc"[..])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .upload(
            &[("title", "Negative"), ("artistId", artist.as_str()), ("albumId", album.as_str()), ("duration", "-1")],
            Some(("x.mp3", &b"abc"[..])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let app = TestApp::with_limit(1024).await;
    let (_, artist_id, album_id) = app.seed().await;

    let (status, _) = app
        .upload(
            &[
                ("title", "Too Big"),
                ("artistId", artist_id.to_string().as_str()),
                ("albumId", album_id.to_string().as_str()),
                ("duration", "1"),
            ],
            Some(("big.mp3", vec![0u8; 4096].as_slice())),
        )
        .await;

    assert!(status.is_client_error(), "got {}", status);
}

#[tokio::test]
async fn test_unknown_audio_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/audio/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/audio/file/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_ids_are_json_bad_requests() {
    let app = TestApp::new().await;

    for uri in [
        "/api/audio/abc",
        "/api/audio/file/abc",
        "/api/subscriptions/premium-status/abc",
        "/api/subscriptions/user/1x",
        "/api/artists/xyz",
        "/api/albums/-",
        "/api/songs/9.5",
        "/api/playlists/none",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", uri);
    }

    let (status, body) = app
        .post_empty("/api/subscriptions/create?userId=abc&endDate=2030-01-01T00:00:00Z")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_album_track_listing() {
    let app = TestApp::new().await;
    let (_, _, album_id) = app.seed().await;

    for (title, duration) in [("Intro", 61), ("Outro", 245)] {
        let (status, song) = app
            .post_json(
                "/api/songs",
                json!({"title": title, "durationSeconds": duration, "albumId": album_id}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(song["albumId"], album_id);
    }

    let (status, songs) = app.get(&format!("/api/albums/{}/songs", album_id)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = songs
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Intro", "Outro"]);

    let (status, _) = app.get("/api/albums/404/songs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_validation() {
    let app = TestApp::new().await;
    let (_, _, album_id) = app.seed().await;

    let (status, _) = app
        .post_json("/api/songs", json!({"title": "  ", "albumId": album_id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_json(
            "/api/songs",
            json!({"title": "Backwards", "durationSeconds": -1, "albumId": album_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post_json("/api/songs", json!({"title": "Lost", "albumId": 9999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_playlist_flow() {
    let app = TestApp::new().await;
    let (user_id, _, album_id) = app.seed().await;

    let (_, song) = app
        .post_json(
            "/api/songs",
            json!({"title": "Track", "durationSeconds": 180, "albumId": album_id}),
        )
        .await;
    let song_id = song["id"].as_i64().unwrap();

    let (status, playlist) = app
        .post_json("/api/playlists", json!({"name": "Morning", "userId": user_id}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["userId"], user_id);
    assert_eq!(playlist["songs"], json!([]));
    let playlist_id = playlist["id"].as_i64().unwrap();

    let add_uri = format!("/api/playlists/{}/songs/{}", playlist_id, song_id);
    let (status, added) = app.post_empty(&add_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["songs"].as_array().unwrap().len(), 1);

    // Adding the same song again leaves the playlist unchanged
    let (status, again) = app.post_empty(&add_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["songs"].as_array().unwrap().len(), 1);

    let (status, fetched) = app.get(&format!("/api/playlists/{}", playlist_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Morning");
    assert_eq!(fetched["songs"][0]["id"], song_id);

    let (status, owned) = app.get(&format!("/api/playlists/user/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["id"], playlist_id);
}

#[tokio::test]
async fn test_playlist_not_found_cases() {
    let app = TestApp::new().await;
    let (user_id, _, _) = app.seed().await;

    let (status, _) = app
        .post_json("/api/playlists", json!({"name": "Ghost", "userId": 9999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post_json("/api/playlists", json!({"name": " ", "userId": user_id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, playlist) = app
        .post_json("/api/playlists", json!({"name": "Evening", "userId": user_id}))
        .await;
    let playlist_id = playlist["id"].as_i64().unwrap();

    let (status, _) = app
        .post_empty(&format!("/api/playlists/{}/songs/9999", playlist_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post_empty("/api/playlists/9999/songs/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/playlists/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/playlists/user/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_lookup_by_email_and_status() {
    let app = TestApp::new().await;
    let (user_id, _, _) = app.seed().await;

    let (status, found) = app.get("/api/users/email/u1@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], user_id);

    let (status, _) = app.get("/api/users/email/nobody@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, active) = app.get("/api/users?status=ACTIVE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (status, banned) = app.get("/api/users?status=BANNED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banned, json!([]));

    let (status, body) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
