// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The aggregated statistics endpoint polled by the display client.

use crate::credentials::{resolve_credentials, resolve_time_range, StatsQuery};
use crate::error::{AppError, Result};
use crate::models::{StatsResponse, TimeRange};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

/// How many entries each ranked list carries.
const LIST_LIMIT: u32 = 5;

/// Aggregate top artists, top tracks, recently played and currently playing
/// into one document.
///
/// The four provider calls run concurrently. The first three propagate
/// failure and abort the whole response; currently-playing never fails, it
/// just reports nothing playing.
pub async fn spotify_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    let creds = resolve_credentials(&headers, &query, &state.config)?;
    let time_range = resolve_time_range(&headers, &query);

    let spotify = &state.spotify;
    let (top_artists, top_tracks, recently_played, currently_playing) = tokio::try_join!(
        spotify.top_artists(&creds, &time_range, LIST_LIMIT),
        spotify.top_tracks(&creds, &time_range, LIST_LIMIT),
        spotify.recently_played(&creds, LIST_LIMIT),
        async {
            Ok::<_, AppError>(spotify.currently_playing(&creds).await)
        },
    )?;

    Ok(Json(StatsResponse {
        time_range_label: TimeRange::from_param(&time_range).map(|r| r.label().to_string()),
        top_artists,
        top_tracks,
        recently_played,
        currently_playing,
        updated_at: format_utc_rfc3339(chrono::Utc::now()),
    }))
}
