// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Spotify Stats Relay
//!
//! A small HTTP relay that turns a Spotify refresh token into short-lived
//! access tokens, fetches a user's listening statistics, and republishes
//! them in a compact JSON shape for a low-power display client.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::SpotifyService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub spotify: SpotifyService,
}
