// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use spotify_stats_relay::config::Config;
use spotify_stats_relay::routes::create_router;
use spotify_stats_relay::services::{SpotifyClient, SpotifyService};
use spotify_stats_relay::AppState;
use std::sync::Arc;

/// Create a test app whose Spotify client points at `base_url` (a local
/// mock serving both the accounts and API endpoints).
#[allow(dead_code)]
pub fn create_test_app(config: Config, base_url: &str) -> (Router, Arc<AppState>) {
    let spotify = SpotifyService::new(SpotifyClient::with_base_urls(base_url, base_url));
    let state = Arc::new(AppState { config, spotify });
    (create_router(state.clone()), state)
}

/// Spawn a mock Spotify provider on an ephemeral port; returns its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_spotify(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Fallback credentials for requests that carry none of their own.
#[allow(dead_code)]
pub fn config_with_fallback_creds() -> Config {
    Config {
        spotify_client_id: Some("test-client".to_string()),
        spotify_client_secret: Some("test-secret".to_string()),
        spotify_refresh_token: Some("test-refresh".to_string()),
        ..Config::default()
    }
}

/// A provider mock where every endpoint answers successfully.
#[allow(dead_code)]
pub fn happy_provider() -> Router {
    Router::new()
        .route("/api/token", post(|| async { Json(token_grant()) }))
        .route("/me/top/artists", get(|| async { Json(top_artists()) }))
        .route("/me/top/tracks", get(|| async { Json(top_tracks()) }))
        .route(
            "/me/player/recently-played",
            get(|| async { Json(recently_played()) }),
        )
        .route(
            "/me/player/currently-playing",
            get(|| async { Json(currently_playing()) }),
        )
}

#[allow(dead_code)]
pub fn token_grant() -> serde_json::Value {
    json!({
        "access_token": "test-access-token",
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "user-top-read user-read-recently-played user-read-currently-playing",
    })
}

#[allow(dead_code)]
pub fn top_artists() -> serde_json::Value {
    json!({
        "items": [
            {
                "name": "Boards of Canada",
                "genres": ["idm", "downtempo", "ambient", "electronica"],
                "images": [{"url": "https://i.scdn.co/image/artist-boc", "height": 640, "width": 640}],
            },
            {
                "name": "Cocteau Twins",
                "genres": [],
                "images": [],
            },
        ],
    })
}

#[allow(dead_code)]
pub fn top_tracks() -> serde_json::Value {
    json!({
        "items": [
            {
                "name": "Roygbiv",
                "artists": [{"name": "Boards of Canada"}],
                "album": {
                    "name": "Music Has the Right to Children",
                    "images": [{"url": "https://i.scdn.co/image/album-mhtrtc"}],
                },
                "duration_ms": 148000,
            },
        ],
    })
}

#[allow(dead_code)]
pub fn recently_played() -> serde_json::Value {
    json!({
        "items": [
            {
                "track": {
                    "name": "Cherry-coloured Funk",
                    "artists": [{"name": "Cocteau Twins"}],
                    "album": {"name": "Heaven or Las Vegas", "images": []},
                    "duration_ms": 199000,
                },
                "played_at": "2024-01-05T15:04:05.123Z",
            },
        ],
    })
}

#[allow(dead_code)]
pub fn currently_playing() -> serde_json::Value {
    json!({
        "is_playing": true,
        "progress_ms": 61000,
        "item": {
            "name": "Pearly-Dewdrops' Drops",
            "artists": [{"name": "Cocteau Twins"}],
            "album": {"name": "Treasure", "images": []},
            "duration_ms": 251000,
        },
    })
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
