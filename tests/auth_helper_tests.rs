// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for the one-time authorization helper.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::json;
use spotify_stats_relay::config::{AuthHelperConfig, AUTH_HELPER_PORT};
use spotify_stats_relay::routes::authorize::{create_router, AuthHelperState};
use spotify_stats_relay::services::SpotifyClient;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

fn helper_app(base_url: &str) -> Router {
    let config = AuthHelperConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        port: AUTH_HELPER_PORT,
    };
    create_router(Arc::new(AuthHelperState {
        config,
        client: SpotifyClient::with_base_urls(base_url, base_url),
    }))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_index_links_to_login() {
    let app = helper_app("http://127.0.0.1:9");

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("href=\"/login\""));
    assert!(body.contains("Authorize with Spotify"));
}

#[tokio::test]
async fn test_login_redirects_to_consent_screen() {
    let app = helper_app("https://accounts.example");

    let response = app.oneshot(get_request("/login")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("https://accounts.example/authorize?response_type=code"));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("user-top-read"));
    assert!(location.contains("user-read-recently-played"));
    assert!(location.contains("user-read-currently-playing"));
    assert!(location.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"));
}

#[tokio::test]
async fn test_callback_without_code_is_an_error() {
    let app = helper_app("http://127.0.0.1:9");

    let response = app.oneshot(get_request("/callback")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert_eq!(body, "Error: No authorization code received");
}

#[tokio::test]
async fn test_callback_displays_refresh_token() {
    let provider = Router::new().route(
        "/api/token",
        post(|| async {
            Json(json!({
                "access_token": "acc-token",
                "refresh_token": "refresh-secret-value",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "user-top-read",
            }))
        }),
    );
    let base_url = common::spawn_mock_spotify(provider).await;
    let app = helper_app(&base_url);

    let response = app.oneshot(get_request("/callback?code=abc123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("SPOTIFY_REFRESH_TOKEN="));
    assert!(body.contains("refresh-secret-value"));
    assert!(body.contains("acc-token"));
    assert!(body.contains("expires in 3600s"));
}

#[tokio::test]
async fn test_callback_exchange_failure_renders_error_page() {
    let provider = Router::new().route(
        "/api/token",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
            )
        }),
    );
    let base_url = common::spawn_mock_spotify(provider).await;
    let app = helper_app(&base_url);

    let response = app.oneshot(get_request("/callback?code=bad")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Error getting refresh token"));
}
