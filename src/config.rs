//! Application configuration loaded from environment variables.
//!
//! Credentials in the environment are only a fallback for local testing;
//! the display client normally supplies its own with every request.

use std::env;

/// Fixed port for the one-time authorization helper.
pub const AUTH_HELPER_PORT: u16 = 8888;

/// Stats server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify OAuth client ID (fallback for requests that carry none)
    pub spotify_client_id: Option<String>,
    /// Spotify OAuth client secret (fallback)
    pub spotify_client_secret: Option<String>,
    /// Spotify refresh token (fallback)
    pub spotify_refresh_token: Option<String>,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_refresh_token: None,
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All Spotify credentials are optional here: requests may carry their
    /// own in headers or query parameters, so startup never fails on a
    /// missing credential.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            spotify_client_id: non_empty(env::var("SPOTIFY_CLIENT_ID").ok()),
            spotify_client_secret: non_empty(env::var("SPOTIFY_CLIENT_SECRET").ok()),
            spotify_refresh_token: non_empty(env::var("SPOTIFY_REFRESH_TOKEN").ok()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        }
    }
}

/// Authorization helper configuration.
///
/// Unlike the stats server, the helper cannot do anything without client
/// credentials, so both are required.
#[derive(Debug, Clone)]
pub struct AuthHelperConfig {
    /// Spotify OAuth client ID
    pub client_id: String,
    /// Spotify OAuth client secret
    pub client_secret: String,
    /// Helper port (fixed; the callback URL is registered with Spotify)
    pub port: u16,
}

impl AuthHelperConfig {
    /// Load helper configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            client_id: env::var("SPOTIFY_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SPOTIFY_CLIENT_ID"))?,
            client_secret: env::var("SPOTIFY_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SPOTIFY_CLIENT_SECRET"))?,
            port: AUTH_HELPER_PORT,
        })
    }

    /// Callback URL registered with Spotify for the helper.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
