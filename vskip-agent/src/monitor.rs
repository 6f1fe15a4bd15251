//! Skip monitor state machine
//!
//! Watches the playback position of one session and decides when to
//! seek past the intro or the ending. Each segment has an independent
//! one-way rule: armed until it fires once, then permanently inert for
//! the session, even if the position re-enters the range afterwards.
//!
//! The monitor is purely reactive. It performs no polling and holds no
//! clock; it only answers "given this position, what seeks are due".

use vskip_common::{SegmentKind, SegmentSet};

/// A seek the monitor wants issued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seek {
    /// Which segment fired
    pub kind: SegmentKind,
    /// Position update that triggered the rule
    pub from: f64,
    /// Absolute seek target (the segment's end)
    pub to: f64,
}

/// Per-session skip state machine
///
/// **Design:**
/// - Two flags, one per segment kind, each `Armed -> Fired` one-way
/// - Open interval bounds: a position exactly on a boundary never fires
/// - Intro rule evaluated before the ending rule on every update; both
///   may fire on the same update when the ranges overlap
#[derive(Debug, Clone)]
pub struct SkipMonitor {
    segments: SegmentSet,
    intro_fired: bool,
    ending_fired: bool,
}

impl SkipMonitor {
    /// Create a monitor with both rules armed
    pub fn new(segments: SegmentSet) -> Self {
        Self {
            segments,
            intro_fired: false,
            ending_fired: false,
        }
    }

    /// The segment set this monitor was armed with
    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    /// Whether a segment's rule has already fired
    pub fn has_fired(&self, kind: SegmentKind) -> bool {
        match kind {
            SegmentKind::Intro => self.intro_fired,
            SegmentKind::Ending => self.ending_fired,
        }
    }

    /// Evaluate both rules against a position update
    ///
    /// Returns the seeks due for this update, intro first. At most one
    /// seek per segment per session; callers issue them in order.
    pub fn on_position(&mut self, position: f64) -> Vec<Seek> {
        let mut seeks = Vec::new();

        if !self.intro_fired
            && position > self.segments.intro_start
            && position < self.segments.intro_end
        {
            self.intro_fired = true;
            seeks.push(Seek {
                kind: SegmentKind::Intro,
                from: position,
                to: self.segments.intro_end,
            });
        }

        if !self.ending_fired
            && position > self.segments.ending_start
            && position < self.segments.ending_end
        {
            self.ending_fired = true;
            seeks.push(Seek {
                kind: SegmentKind::Ending,
                from: position,
                to: self.segments.ending_end,
            });
        }

        seeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments_24_min() -> SegmentSet {
        SegmentSet {
            intro_start: 0.0,
            intro_end: 90.0,
            ending_start: 1296.0,
            ending_end: 1440.0,
        }
    }

    #[test]
    fn test_intro_fires_once_despite_many_updates() {
        let mut monitor = SkipMonitor::new(segments_24_min());

        let mut seeks = Vec::new();
        // Dozens of updates inside the open intro interval
        for i in 1..60 {
            seeks.extend(monitor.on_position(i as f64));
        }

        assert_eq!(seeks.len(), 1);
        assert_eq!(seeks[0].kind, SegmentKind::Intro);
        assert_eq!(seeks[0].from, 1.0);
        assert_eq!(seeks[0].to, 90.0);
        assert!(monitor.has_fired(SegmentKind::Intro));
        assert!(!monitor.has_fired(SegmentKind::Ending));
    }

    #[test]
    fn test_boundary_positions_never_fire() {
        let mut monitor = SkipMonitor::new(segments_24_min());

        assert!(monitor.on_position(0.0).is_empty()); // == intro_start
        assert!(monitor.on_position(90.0).is_empty()); // == intro_end
        assert!(monitor.on_position(1296.0).is_empty()); // == ending_start
        assert!(monitor.on_position(1440.0).is_empty()); // == ending_end

        assert!(!monitor.has_fired(SegmentKind::Intro));
        assert!(!monitor.has_fired(SegmentKind::Ending));
    }

    #[test]
    fn test_reentry_after_firing_is_inert() {
        let mut monitor = SkipMonitor::new(segments_24_min());

        assert_eq!(monitor.on_position(45.0).len(), 1);

        // Player buffering replays part of the intro range
        assert!(monitor.on_position(46.0).is_empty());
        assert!(monitor.on_position(10.0).is_empty());
        assert!(monitor.on_position(89.9).is_empty());
    }

    #[test]
    fn test_ending_fires_independently() {
        let mut monitor = SkipMonitor::new(segments_24_min());

        let seeks = monitor.on_position(1297.0);
        assert_eq!(seeks.len(), 1);
        assert_eq!(seeks[0].kind, SegmentKind::Ending);
        assert_eq!(seeks[0].to, 1440.0);

        // Intro is still armed; ending is now inert
        assert!(monitor.on_position(1350.0).is_empty());
        let seeks = monitor.on_position(45.0);
        assert_eq!(seeks.len(), 1);
        assert_eq!(seeks[0].kind, SegmentKind::Intro);
    }

    #[test]
    fn test_positions_outside_all_ranges() {
        let mut monitor = SkipMonitor::new(segments_24_min());

        assert!(monitor.on_position(200.0).is_empty());
        assert!(monitor.on_position(1000.0).is_empty());
        assert!(monitor.on_position(2000.0).is_empty());
    }

    #[test]
    fn test_full_episode_position_stream() {
        // Runtime 24 min, positions [0, 45, 91, 1200, 1297, 1350, 1440]:
        // exactly two seeks, to 90 (at t=45) and to 1440 (at t=1297).
        let mut monitor = SkipMonitor::new(segments_24_min());

        let mut seeks = Vec::new();
        for position in [0.0, 45.0, 91.0, 1200.0, 1297.0, 1350.0, 1440.0] {
            seeks.extend(monitor.on_position(position));
        }

        assert_eq!(
            seeks,
            vec![
                Seek {
                    kind: SegmentKind::Intro,
                    from: 45.0,
                    to: 90.0,
                },
                Seek {
                    kind: SegmentKind::Ending,
                    from: 1297.0,
                    to: 1440.0,
                },
            ]
        );
    }

    #[test]
    fn test_overlapping_ranges_fire_both_in_one_update() {
        // Pathologically short runtime: both open intervals contain 88.
        // No mutual-exclusion special case; intro is reported first.
        let overlapping = SegmentSet {
            intro_start: 0.0,
            intro_end: 90.0,
            ending_start: 86.0,
            ending_end: 96.0,
        };
        let mut monitor = SkipMonitor::new(overlapping);

        let seeks = monitor.on_position(88.0);
        assert_eq!(seeks.len(), 2);
        assert_eq!(seeks[0].kind, SegmentKind::Intro);
        assert_eq!(seeks[1].kind, SegmentKind::Ending);
    }
}
