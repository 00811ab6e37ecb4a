//! Provider time ranges for "top" statistics.

/// Wire value sent when a request does not pick a range.
pub const DEFAULT_TIME_RANGE: &str = "medium_term";

/// Aggregation window understood by the provider's top-artists and
/// top-tracks endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Parse a wire value. Unrecognized values yield `None`; the raw string
    /// is still forwarded upstream, so the provider decides what to make of
    /// it — only the display label disappears.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "short_term" => Some(Self::ShortTerm),
            "medium_term" => Some(Self::MediumTerm),
            "long_term" => Some(Self::LongTerm),
            _ => None,
        }
    }

    /// Human-readable label shown on the display client.
    pub fn label(self) -> &'static str {
        match self {
            Self::ShortTerm => "Last 4 Weeks",
            Self::MediumTerm => "Last 6 Months",
            Self::LongTerm => "All Time",
        }
    }
}
