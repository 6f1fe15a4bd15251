//! Event types and event bus for the vskip agent
//!
//! # Architecture
//!
//! vskip uses one-to-many broadcasting for observability:
//! - **EventBus** (tokio::broadcast): lifecycle and skip events
//! - Position updates themselves stay on the video surface's own
//!   subscription and never pass through this bus
//!
//! Emission never blocks the position-update path; `emit_lossy` is used
//! on hot paths where "nobody is listening" is acceptable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::segments::{EpisodeIdentity, SegmentKind, SegmentSet, SegmentSource};

/// vskip event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipEvent {
    /// A playback session was accepted and metadata resolution started
    SessionStarted {
        session_id: Uuid,
        identity: EpisodeIdentity,
        timestamp: DateTime<Utc>,
    },

    /// Segments were resolved and the skip monitor is armed
    ///
    /// Emitted after the monitor has subscribed to position updates, so
    /// a subscriber that sees this event can rely on the session being
    /// live.
    SegmentsResolved {
        session_id: Uuid,
        segments: SegmentSet,
        source: SegmentSource,
        timestamp: DateTime<Utc>,
    },

    /// A skip rule fired and a seek was issued
    SkipPerformed {
        session_id: Uuid,
        kind: SegmentKind,
        from_secs: f64,
        to_secs: f64,
        timestamp: DateTime<Utc>,
    },

    /// Skipping is disabled for this session (degraded path, not an error)
    SkipUnavailable {
        /// None when session setup aborted before an id was assigned
        session_id: Option<Uuid>,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A session's position-update subscription was detached
    SessionDetached {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl SkipEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            SkipEvent::SessionStarted { .. } => "SessionStarted",
            SkipEvent::SegmentsResolved { .. } => "SegmentsResolved",
            SkipEvent::SkipPerformed { .. } => "SkipPerformed",
            SkipEvent::SkipUnavailable { .. } => "SkipUnavailable",
            SkipEvent::SessionDetached { .. } => "SessionDetached",
        }
    }

    /// Session id carried by the event, when one was assigned
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            SkipEvent::SessionStarted { session_id, .. }
            | SkipEvent::SegmentsResolved { session_id, .. }
            | SkipEvent::SkipPerformed { session_id, .. }
            | SkipEvent::SessionDetached { session_id, .. } => Some(*session_id),
            SkipEvent::SkipUnavailable { session_id, .. } => *session_id,
        }
    }
}

/// One-to-many event broadcaster
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SkipEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    ///
    /// Old events are dropped for lagging subscribers once `capacity`
    /// is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SkipEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`, or `Err` if no subscribers are
    /// listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: SkipEvent) -> Result<usize, broadcast::error::SendError<SkipEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring whether anyone is listening
    pub fn emit_lossy(&self, event: SkipEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::trace!(event = %e.0.event_type(), "no subscribers for event");
        }
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
