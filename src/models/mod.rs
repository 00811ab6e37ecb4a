// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod stats;
pub mod time_range;

pub use stats::{CurrentlyPlaying, RecentlyPlayedTrack, StatsResponse, TopArtist, TopTrack};
pub use time_range::{TimeRange, DEFAULT_TIME_RANGE};
