// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request credential resolution.
//!
//! Every stats request carries (or falls back to) a full Spotify credential
//! set. Resolution order is headers, then query parameters, then the
//! process-environment fallback loaded into [`Config`].

use axum::http::HeaderMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::AppError;

/// Header names the display client sends credentials under.
pub const CLIENT_ID_HEADER: &str = "x-spotify-client-id";
pub const CLIENT_SECRET_HEADER: &str = "x-spotify-client-secret";
pub const REFRESH_TOKEN_HEADER: &str = "x-spotify-refresh-token";
pub const TIME_RANGE_HEADER: &str = "x-spotify-time-range";

/// A complete Spotify credential set for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    /// Cache key for the access-token cache.
    ///
    /// Hashed so the refresh token itself never sits in a map key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.client_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.refresh_token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Query parameters accepted by the stats endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub time_range: Option<String>,
}

/// Resolve a credential set from headers, query parameters, then the
/// environment fallback, in that order.
///
/// Reports the first missing field so the caller sees one actionable error.
pub fn resolve_credentials(
    headers: &HeaderMap,
    query: &StatsQuery,
    fallback: &Config,
) -> Result<Credentials, AppError> {
    let client_id = pick(
        headers,
        CLIENT_ID_HEADER,
        query.client_id.as_deref(),
        fallback.spotify_client_id.as_deref(),
    )
    .ok_or(AppError::MissingCredentials("client id"))?;

    let client_secret = pick(
        headers,
        CLIENT_SECRET_HEADER,
        query.client_secret.as_deref(),
        fallback.spotify_client_secret.as_deref(),
    )
    .ok_or(AppError::MissingCredentials("client secret"))?;

    let refresh_token = pick(
        headers,
        REFRESH_TOKEN_HEADER,
        query.refresh_token.as_deref(),
        fallback.spotify_refresh_token.as_deref(),
    )
    .ok_or(AppError::MissingCredentials("refresh token"))?;

    Ok(Credentials {
        client_id,
        client_secret,
        refresh_token,
    })
}

/// Resolve the statistics time range: header, then query, then the provider
/// default. The raw value is forwarded upstream untouched.
pub fn resolve_time_range(headers: &HeaderMap, query: &StatsQuery) -> String {
    header_value(headers, TIME_RANGE_HEADER)
        .or_else(|| {
            query
                .time_range
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| crate::models::DEFAULT_TIME_RANGE.to_string())
}

fn pick(
    headers: &HeaderMap,
    header_name: &str,
    query: Option<&str>,
    env: Option<&str>,
) -> Option<String> {
    header_value(headers, header_name)
        .or_else(|| query.filter(|v| !v.is_empty()).map(str::to_string))
        .or_else(|| env.filter(|v| !v.is_empty()).map(str::to_string))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
