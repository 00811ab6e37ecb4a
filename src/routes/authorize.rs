// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-time authorization helper routes.
//!
//! Walks the operator through the authorization-code flow in a browser and
//! displays the resulting refresh token for manual copy into configuration.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AuthHelperConfig;
use crate::services::SpotifyClient;

/// Scopes the stats server's read endpoints need.
const SCOPES: &str = "user-top-read user-read-recently-played user-read-currently-playing";

/// Shared state for the helper routes.
pub struct AuthHelperState {
    pub config: AuthHelperConfig,
    pub client: SpotifyClient,
}

/// Build the helper router.
pub fn create_router(state: Arc<AuthHelperState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/callback", get(callback))
        .with_state(state)
}

/// Instructions page with the authorize link.
async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Redirect to the provider consent screen.
async fn login(State(state): State<Arc<AuthHelperState>>) -> Redirect {
    let url = state.client.authorize_url(
        &state.config.client_id,
        &state.config.redirect_uri(),
        SCOPES,
    );
    Redirect::temporary(&url)
}

#[derive(Deserialize)]
struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// Exchange the authorization code for tokens and display the refresh token.
async fn callback(
    State(state): State<Arc<AuthHelperState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(code) = params.code else {
        return "Error: No authorization code received".into_response();
    };

    let exchange = state
        .client
        .exchange_code(
            &state.config.client_id,
            &state.config.client_secret,
            &code,
            &state.config.redirect_uri(),
        )
        .await;

    match exchange {
        Ok(tokens) => {
            // Logged on purpose: this is where the operator copies the value.
            tracing::info!(
                refresh_token = %tokens.refresh_token,
                "Authorization successful, add SPOTIFY_REFRESH_TOKEN to your .env file"
            );
            Html(success_page(
                &tokens.refresh_token,
                &tokens.access_token,
                tokens.expires_in,
            ))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Error exchanging code for token");
            Html(FAILURE_PAGE).into_response()
        }
    }
}

const INDEX_PAGE: &str = r#"<html>
  <head><title>Spotify Token Generator</title></head>
  <body style="font-family: sans-serif; padding: 40px; text-align: center;">
    <h1>Spotify Refresh Token Generator</h1>
    <p>Click the button below to authorize with Spotify:</p>
    <a href="/login" style="display: inline-block; background: #1DB954; color: white;
      padding: 15px 30px; text-decoration: none; border-radius: 25px; font-weight: bold;
      margin-top: 20px;">
      Authorize with Spotify
    </a>
  </body>
</html>"#;

const FAILURE_PAGE: &str = "Error getting refresh token. Check the console.";

fn success_page(refresh_token: &str, access_token: &str, expires_in: i64) -> String {
    format!(
        r#"<html>
  <head><title>Spotify Authorization Successful</title></head>
  <body style="font-family: monospace; padding: 20px;">
    <h1>Authorization Successful!</h1>
    <p>Copy the refresh token below and add it to your .env file:</p>
    <div style="background: #f0f0f0; padding: 15px; margin: 20px 0; border-radius: 5px;">
      <strong>SPOTIFY_REFRESH_TOKEN=</strong>{refresh_token}
    </div>
    <p><strong>Access Token (expires in {expires_in}s):</strong></p>
    <div style="background: #f0f0f0; padding: 15px; margin: 20px 0; border-radius: 5px; word-break: break-all;">
      {access_token}
    </div>
    <p>You can close this window and stop the server (Ctrl+C).</p>
  </body>
</html>"#
    )
}
