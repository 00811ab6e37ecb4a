// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client for listening statistics.
//!
//! Handles:
//! - Refresh-token grants with an in-memory access-token cache
//! - Top artists / top tracks / recently played / currently playing
//! - Authorization-code exchange for the one-time helper

use crate::credentials::Credentials;
use crate::error::AppError;
use crate::models::{CurrentlyPlaying, RecentlyPlayedTrack, TopArtist, TopTrack};
use crate::time_utils::format_played_at;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Spotify API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_base_url: String,
    api_base_url: String,
}

impl SpotifyClient {
    /// Create a client against the real Spotify endpoints.
    pub fn new() -> Self {
        Self::with_base_urls(ACCOUNTS_BASE_URL, API_BASE_URL)
    }

    /// Create a client against alternate base URLs (tests point these at a
    /// local mock).
    pub fn with_base_urls(
        accounts_base_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            accounts_base_url: accounts_base_url.into(),
            api_base_url: api_base_url.into(),
        }
    }

    /// URL of the provider consent screen for the authorization-code flow.
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str, scopes: &str) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}&scope={}&redirect_uri={}",
            self.accounts_base_url,
            urlencoding::encode(client_id),
            urlencoding::encode(scopes),
            urlencoding::encode(redirect_uri),
        )
    }

    /// Exchange an authorization code for an access/refresh token pair.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResponse, AppError> {
        self.token_request(
            client_id,
            client_secret,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await
    }

    /// Refresh-token grant for a short-lived access token.
    pub async fn refresh_access_token(
        &self,
        creds: &Credentials,
    ) -> Result<TokenGrantResponse, AppError> {
        self.token_request(
            &creds.client_id,
            &creds.client_secret,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", &creds.refresh_token),
            ],
        )
        .await
    }

    /// Server-to-server POST to the token endpoint with HTTP Basic auth.
    async fn token_request<T: for<'de> Deserialize<'de>>(
        &self,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let authorization = STANDARD.encode(format!("{}:{}", client_id, client_secret));

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base_url))
            .header("Authorization", format!("Basic {}", authorization))
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::SpotifyApi(format!("Token request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_base_url, path))
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::SpotifyApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// GET /me/player/currently-playing.
    ///
    /// `Ok(None)` when the provider reports no active playback: HTTP 204 or
    /// an empty payload.
    async fn currently_playing_raw(
        &self,
        access_token: &str,
    ) -> Result<Option<CurrentlyPlayingResponse>, AppError> {
        let response = self
            .http
            .get(format!("{}/me/player/currently-playing", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::SpotifyApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SpotifyApi(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SpotifyApi(e.to_string()))?;
        if body.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| AppError::SpotifyApi(format!("JSON parse error: {}", e)))
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SpotifyApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::SpotifyApi(format!("JSON parse error: {}", e)))
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Token response for the refresh-token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrantResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Token response for the authorization-code grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Item envelope shared by /me/top/* and /me/player/recently-played.
#[derive(Debug, Clone, Deserialize)]
struct PagedItems<T> {
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct ArtistItem {
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageRef {
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TrackItem {
    name: String,
    artists: Vec<ArtistRef>,
    album: AlbumRef,
    duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AlbumRef {
    name: String,
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlayHistoryItem {
    track: TrackItem,
    played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrentlyPlayingResponse {
    item: Option<TrackItem>,
    #[serde(default)]
    is_playing: bool,
    progress_ms: Option<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// SpotifyService - high-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin subtracted from the provider's `expires_in` so a token is never
/// presented right at its expiry instant (one minute).
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Cached access token with expiry information.
#[derive(Clone)]
pub struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Record a freshly granted token; the recorded expiry ends one minute
    /// before the provider's `expires_in` window does.
    pub fn new(access_token: String, expires_in: i64, now: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expires_at: now + Duration::seconds(expires_in - TOKEN_EXPIRY_MARGIN_SECS),
        }
    }

    /// Whether the token is still usable at `now`.
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Shared token cache type, keyed by credential fingerprint.
pub type TokenCache = Arc<DashMap<String, CachedToken>>;

/// Shared refresh locks type, keyed by credential fingerprint.
pub type RefreshLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// High-level Spotify service that manages token lifecycle and API calls.
///
/// This service encapsulates:
/// - Refresh-token grants with a one-minute expiry margin
/// - In-memory access-token caching per credential set
/// - Per-credential locking to prevent duplicate refresh calls
/// - The four read endpoints the stats endpoint aggregates
#[derive(Clone)]
pub struct SpotifyService {
    client: SpotifyClient,
    token_cache: TokenCache,
    refresh_locks: RefreshLocks,
}

impl SpotifyService {
    pub fn new(client: SpotifyClient) -> Self {
        Self {
            client,
            token_cache: Arc::new(DashMap::new()),
            refresh_locks: Arc::new(DashMap::new()),
        }
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a valid (non-expired) access token for the given credential set.
    ///
    /// 1. Check the in-memory cache (fast path - no I/O)
    /// 2. Acquire the per-credential lock so only one task refreshes
    /// 3. Re-check the cache after the lock (another task may have refreshed)
    /// 4. Perform the refresh-token grant and cache the result
    pub async fn access_token(&self, creds: &Credentials) -> Result<String, AppError> {
        let key = creds.fingerprint();
        let now = Utc::now();

        if let Some(cached) = self.token_cache.get(&key) {
            if cached.valid_at(now) {
                return Ok(cached.access_token.clone());
            }
            // Expired - fall through to refresh
        }

        let lock = self
            .refresh_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = lock.lock().await;

        // Another task may have refreshed while we were waiting.
        if let Some(cached) = self.token_cache.get(&key) {
            if cached.valid_at(now) {
                return Ok(cached.access_token.clone());
            }
        }

        tracing::debug!("Access token missing or expired, refreshing");
        let grant = self.client.refresh_access_token(creds).await?;
        self.token_cache.insert(
            key,
            CachedToken::new(grant.access_token.clone(), grant.expires_in, Utc::now()),
        );

        Ok(grant.access_token)
    }

    // ─── Data Fetchers ───────────────────────────────────────────────────────

    /// Top artists over `time_range`, ranked from 1.
    pub async fn top_artists(
        &self,
        creds: &Credentials,
        time_range: &str,
        limit: u32,
    ) -> Result<Vec<TopArtist>, AppError> {
        let token = self.access_token(creds).await?;
        let page: PagedItems<ArtistItem> = self
            .client
            .get_json(
                "/me/top/artists",
                &token,
                &[
                    ("time_range", time_range.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, artist)| TopArtist {
                rank: i as u32 + 1,
                name: artist.name,
                genres: join_genres(&artist.genres),
                image: artist.images.first().map(|img| img.url.clone()),
            })
            .collect())
    }

    /// Top tracks over `time_range`, ranked from 1.
    pub async fn top_tracks(
        &self,
        creds: &Credentials,
        time_range: &str,
        limit: u32,
    ) -> Result<Vec<TopTrack>, AppError> {
        let token = self.access_token(creds).await?;
        let page: PagedItems<TrackItem> = self
            .client
            .get_json(
                "/me/top/tracks",
                &token,
                &[
                    ("time_range", time_range.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, track)| TopTrack {
                rank: i as u32 + 1,
                name: track.name,
                artist: join_artists(&track.artists),
                album: track.album.name,
                image: track.album.images.first().map(|img| img.url.clone()),
            })
            .collect())
    }

    /// Most recently played tracks, most recent first.
    pub async fn recently_played(
        &self,
        creds: &Credentials,
        limit: u32,
    ) -> Result<Vec<RecentlyPlayedTrack>, AppError> {
        let token = self.access_token(creds).await?;
        let page: PagedItems<PlayHistoryItem> = self
            .client
            .get_json(
                "/me/player/recently-played",
                &token,
                &[("limit", limit.to_string())],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| RecentlyPlayedTrack {
                rank: i as u32 + 1,
                name: item.track.name,
                artist: join_artists(&item.track.artists),
                played_at: format_played_at(&item.played_at),
            })
            .collect())
    }

    /// The track playing right now, or `None` when nothing is.
    ///
    /// Any failure here (token refresh included) is treated as "nothing is
    /// playing" rather than failing the whole aggregation.
    pub async fn currently_playing(&self, creds: &Credentials) -> Option<CurrentlyPlaying> {
        match self.try_currently_playing(creds).await {
            Ok(playing) => playing,
            Err(e) => {
                tracing::warn!(error = %e, "Currently-playing fetch failed, treating as idle");
                None
            }
        }
    }

    async fn try_currently_playing(
        &self,
        creds: &Credentials,
    ) -> Result<Option<CurrentlyPlaying>, AppError> {
        let token = self.access_token(creds).await?;
        let Some(body) = self.client.currently_playing_raw(&token).await? else {
            return Ok(None);
        };
        let Some(item) = body.item else {
            return Ok(None);
        };

        Ok(Some(CurrentlyPlaying {
            name: item.name,
            artist: join_artists(&item.artists),
            album: item.album.name,
            is_playing: body.is_playing,
            progress_ms: body.progress_ms,
            duration_ms: item.duration_ms,
        }))
    }
}

/// First three genres joined for display, or "N/A" when the provider has none.
fn join_genres(genres: &[String]) -> String {
    if genres.is_empty() {
        return "N/A".to_string();
    }
    genres
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_artists(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
