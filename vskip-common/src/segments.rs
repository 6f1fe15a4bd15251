//! Segment and episode identity types
//!
//! vskip works in one time representation: f64 seconds relative to the
//! start of the episode, matching what video surfaces report for the
//! playback position. Segment boundaries are derived once per session
//! and treated as immutable afterwards.

use serde::{Deserialize, Serialize};

/// Lookup key for one episode's metadata
///
/// All three fields are strictly positive; payload validation happens in
/// the agent before an identity is ever constructed. Immutable once
/// captured for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeIdentity {
    /// Series id in the metadata provider's namespace
    pub series_id: u64,
    /// Season number (1-based)
    pub season: u32,
    /// Episode number within the season (1-based)
    pub episode: u32,
}

impl std::fmt::Display for EpisodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "series {} S{:02}E{:02}",
            self.series_id, self.season, self.episode
        )
    }
}

/// Episode metadata as returned by the provider
///
/// `runtime_minutes` may be absent or non-positive; the resolver treats
/// both the same way. `name` is carried for logging only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    /// Episode runtime in minutes, when the provider knows it
    pub runtime_minutes: Option<f64>,
    /// Episode title, when the provider knows it
    pub name: Option<String>,
}

/// Intro and ending boundaries for one episode, in seconds
///
/// Invariant: `intro_start <= intro_end <= ending_start <= ending_end`.
/// The resolver does not enforce this for pathologically short runtimes
/// (see `is_ordered`), and the monitor stays correct without it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSet {
    pub intro_start: f64,
    pub intro_end: f64,
    pub ending_start: f64,
    pub ending_end: f64,
}

impl SegmentSet {
    /// Check the ordering invariant
    pub fn is_ordered(&self) -> bool {
        self.intro_start <= self.intro_end
            && self.intro_end <= self.ending_start
            && self.ending_start <= self.ending_end
    }

    /// Open-interval bounds for one segment kind
    pub fn bounds(&self, kind: SegmentKind) -> (f64, f64) {
        match kind {
            SegmentKind::Intro => (self.intro_start, self.intro_end),
            SegmentKind::Ending => (self.ending_start, self.ending_end),
        }
    }
}

/// Which segment a skip rule covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Intro,
    Ending,
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentKind::Intro => write!(f, "intro"),
            SegmentKind::Ending => write!(f, "ending"),
        }
    }
}

/// How a segment set was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
    /// Provider metadata supplied a usable runtime
    Provider,
    /// Provider responded but without a usable runtime; default runtime used
    RuntimeDefault,
    /// Provider unavailable; hard fallback segment set used
    Fallback,
}

impl std::fmt::Display for SegmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentSource::Provider => write!(f, "provider"),
            SegmentSource::RuntimeDefault => write!(f, "runtime_default"),
            SegmentSource::Fallback => write!(f, "fallback"),
        }
    }
}
