//! Response records served to the display client.
//!
//! These are the compact reshaped forms of the provider's API items; the
//! raw wire types live next to the Spotify client.

use serde::{Deserialize, Serialize};

/// One entry in the ranked top-artists list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopArtist {
    /// 1-based rank
    pub rank: u32,
    pub name: String,
    /// Up to three genres joined with ", ", or "N/A"
    pub genres: String,
    /// First artist image URL, if any
    pub image: Option<String>,
}

/// One entry in the ranked top-tracks list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTrack {
    /// 1-based rank
    pub rank: u32,
    pub name: String,
    /// All track artists joined with ", "
    pub artist: String,
    pub album: String,
    /// First album image URL, if any
    pub image: Option<String>,
}

/// One entry in the recently-played list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayedTrack {
    /// 1-based rank (most recent first)
    pub rank: u32,
    pub name: String,
    pub artist: String,
    /// Display-formatted play time, e.g. "Jan 5, 3:04 PM"
    pub played_at: String,
}

/// The track playing right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub is_playing: bool,
    /// Playback position; the provider omits it for some playback types
    pub progress_ms: Option<u64>,
    pub duration_ms: u64,
}

/// The aggregated document the display client polls for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Absent when the requested time range is not one the provider defines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_label: Option<String>,
    pub top_artists: Vec<TopArtist>,
    pub top_tracks: Vec<TopTrack>,
    pub recently_played: Vec<RecentlyPlayedTrack>,
    /// `null` when nothing is playing.
    pub currently_playing: Option<CurrentlyPlaying>,
    /// Server-generated RFC3339 timestamp.
    pub updated_at: String,
}
