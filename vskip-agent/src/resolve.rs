//! Segment resolution
//!
//! Pure, deterministic derivation of intro/ending boundaries from
//! episode metadata, with a fixed fallback when the provider is
//! unavailable. No network access and no caching: a fresh resolution
//! happens once per session.
//!
//! The constants are heuristics, not measurements: a 90-second intro
//! and an ending covering the last 10% of the runtime. Runtimes shorter
//! than the intro heuristic are returned as computed; the monitor's
//! open intervals keep the resulting overlap harmless.

use vskip_common::{EpisodeMetadata, SegmentSet, SegmentSource};

/// Fixed intro start (seconds)
pub const INTRO_START_SECS: f64 = 0.0;

/// Fixed intro end (seconds); not derived from runtime
pub const INTRO_END_SECS: f64 = 90.0;

/// Runtime assumed when the provider responds without one (seconds)
pub const DEFAULT_RUNTIME_SECS: f64 = 2700.0;

/// Fraction of the runtime at which the ending begins
pub const ENDING_FRACTION: f64 = 0.9;

/// Hard fallback when the provider is unavailable (models a ~45-minute episode)
pub const FALLBACK_SEGMENTS: SegmentSet = SegmentSet {
    intro_start: 0.0,
    intro_end: 90.0,
    ending_start: 2400.0,
    ending_end: 2700.0,
};

/// Derive the segment set for one episode
///
/// - `None` (lookup failed): the hard fallback set.
/// - `Some` with a positive runtime: 90-second intro, ending from
///   `floor(runtime_secs * 0.9)` to `runtime_secs`.
/// - `Some` without a usable runtime: same formulas over the default
///   2700-second runtime.
///
/// Idempotent: identical input yields identical output.
pub fn resolve_segments(metadata: Option<&EpisodeMetadata>) -> (SegmentSet, SegmentSource) {
    let metadata = match metadata {
        Some(m) => m,
        None => return (FALLBACK_SEGMENTS, SegmentSource::Fallback),
    };

    let (runtime_secs, source) = match metadata.runtime_minutes.filter(|r| *r > 0.0) {
        Some(minutes) => (minutes * 60.0, SegmentSource::Provider),
        None => (DEFAULT_RUNTIME_SECS, SegmentSource::RuntimeDefault),
    };

    let segments = SegmentSet {
        intro_start: INTRO_START_SECS,
        intro_end: INTRO_END_SECS,
        ending_start: (runtime_secs * ENDING_FRACTION).floor(),
        ending_end: runtime_secs,
    };

    (segments, source)
}
