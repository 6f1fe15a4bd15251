//! Video surface abstraction
//!
//! The host player owns the actual video element/stream; the agent only
//! needs three things from it: the current position, an absolute seek,
//! and a push stream of position updates. The surface delivers updates
//! serially and in order; unsubscribing is dropping the receiver.

use tokio::sync::broadcast;

use vskip_common::Result;

/// Handle to the playing video
///
/// Implementations are expected to be cheap to share (`Arc`) and to
/// deliver monotonically non-decreasing positions while playing; seeks
/// (by the agent or the user) may move the position anywhere.
pub trait VideoSurface: Send + Sync {
    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Absolute seek to the given position in seconds
    fn seek(&self, position_secs: f64) -> Result<()>;

    /// Subscribe to position updates (seconds)
    ///
    /// Only updates sent after subscription are delivered; dropping the
    /// receiver unsubscribes.
    fn subscribe_position(&self) -> broadcast::Receiver<f64>;
}
