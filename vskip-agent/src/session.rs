//! Session lifecycle and wiring
//!
//! One `SessionController` serves one host player. At most one playback
//! session is live at a time: every "playback started" notification
//! supersedes the previous session, aborting its task and with it the
//! position-update subscription. An in-flight metadata fetch from a
//! superseded session is discarded by re-checking the session id before
//! the monitor is armed, so a stale result can never activate skipping
//! for the wrong episode.
//!
//! Within a session the fetch is the only suspending step; position
//! updates are handled synchronously in delivery order.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vskip_common::events::{EventBus, SkipEvent};
use vskip_common::{EpisodeIdentity, Error};

use crate::host::{HostEvent, PlayerHost, PlayerItem};
use crate::metadata::SegmentProvider;
use crate::monitor::SkipMonitor;
use crate::resolve::resolve_segments;

/// Wires playback sessions to segment resolution and skip monitoring
pub struct SessionController {
    host: Arc<dyn PlayerHost>,
    provider: Arc<dyn SegmentProvider>,
    events: EventBus,
    /// Id of the current session; compared by session tasks before arming
    current_id: Arc<RwLock<Option<Uuid>>>,
    /// Task of the current session; aborted on supersede
    current_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    pub fn new(
        host: Arc<dyn PlayerHost>,
        provider: Arc<dyn SegmentProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            host,
            provider,
            events,
            current_id: Arc::new(RwLock::new(None)),
            current_task: Mutex::new(None),
        }
    }

    /// Consume host notifications until the host goes away
    ///
    /// Skipping failures never propagate out of this loop; every
    /// degraded path is logged and reported on the event bus instead.
    pub async fn run(self) {
        let mut notifications = self.host.subscribe();
        info!("session controller listening for host notifications");

        loop {
            match notifications.recv().await {
                Ok(HostEvent::PlaybackStarted { item }) => self.start_session(item).await,
                Ok(HostEvent::PlaybackStopped) => {
                    debug!("player torn down");
                    self.detach_current().await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "host notifications lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        self.detach_current().await;
        info!("host notification stream closed; session controller stopped");
    }

    /// Begin a new session, superseding the previous one
    async fn start_session(&self, item: PlayerItem) {
        self.detach_current().await;

        let identity = match item.identity() {
            Ok(identity) => identity,
            Err(e) => {
                warn!(
                    title = item.title.as_deref().unwrap_or("?"),
                    error = %e,
                    "missing episode data; skipping unavailable for this session"
                );
                self.events.emit_lossy(SkipEvent::SkipUnavailable {
                    session_id: None,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                return;
            }
        };

        let session_id = Uuid::new_v4();
        *self.current_id.write().await = Some(session_id);

        info!(%session_id, %identity, "playback session started");
        self.events.emit_lossy(SkipEvent::SessionStarted {
            session_id,
            identity,
            timestamp: Utc::now(),
        });

        let task = tokio::spawn(run_session(
            self.host.clone(),
            self.provider.clone(),
            self.events.clone(),
            self.current_id.clone(),
            session_id,
            identity,
        ));
        *self.current_task.lock().await = Some(task);
    }

    /// Detach the current session's subscription and state, if any
    async fn detach_current(&self) {
        if let Some(task) = self.current_task.lock().await.take() {
            task.abort();
        }
        if let Some(old_id) = self.current_id.write().await.take() {
            debug!(session_id = %old_id, "detached previous session");
            self.events.emit_lossy(SkipEvent::SessionDetached {
                session_id: old_id,
                timestamp: Utc::now(),
            });
        }
    }
}

/// One session: fetch, resolve, arm, then react to position updates
async fn run_session(
    host: Arc<dyn PlayerHost>,
    provider: Arc<dyn SegmentProvider>,
    events: EventBus,
    current_id: Arc<RwLock<Option<Uuid>>>,
    session_id: Uuid,
    identity: EpisodeIdentity,
) {
    // The only suspending step in the session. Any failure degrades to
    // the hard fallback segment set, never to "no skipping at all".
    let metadata = match provider.episode(&identity).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            let error = Error::from(e);
            warn!(%session_id, %identity, %error, "metadata lookup failed; using fallback segments");
            None
        }
    };

    // A newer session may have started while the fetch was in flight;
    // its result must not arm a monitor for the wrong episode.
    if *current_id.read().await != Some(session_id) {
        debug!(%session_id, "superseded during metadata fetch; discarding result");
        return;
    }

    let (segments, source) = resolve_segments(metadata.as_ref());

    let surface = match host.video_surface() {
        Some(surface) => surface,
        None => {
            warn!(%session_id, "no video surface; skipping unavailable for this session");
            events.emit_lossy(SkipEvent::SkipUnavailable {
                session_id: Some(session_id),
                reason: Error::NoVideoSurface.to_string(),
                timestamp: Utc::now(),
            });
            return;
        }
    };

    let mut position_rx = surface.subscribe_position();
    let mut monitor = SkipMonitor::new(segments);

    info!(
        %session_id,
        %source,
        intro_end = segments.intro_end,
        ending_start = segments.ending_start,
        position = surface.position(),
        "skip monitor armed"
    );
    events.emit_lossy(SkipEvent::SegmentsResolved {
        session_id,
        segments,
        source,
        timestamp: Utc::now(),
    });

    loop {
        match position_rx.recv().await {
            Ok(position) => {
                for seek in monitor.on_position(position) {
                    match surface.seek(seek.to) {
                        Ok(()) => {
                            info!(
                                %session_id,
                                kind = %seek.kind,
                                from = seek.from,
                                to = seek.to,
                                "skipped segment"
                            );
                            events.emit_lossy(SkipEvent::SkipPerformed {
                                session_id,
                                kind: seek.kind,
                                from_secs: seek.from,
                                to_secs: seek.to,
                                timestamp: Utc::now(),
                            });
                        }
                        Err(e) => {
                            // The rule stays fired: at most one attempt
                            // per segment per session.
                            warn!(%session_id, kind = %seek.kind, error = %e, "seek failed");
                        }
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(%session_id, skipped, "position updates lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    debug!(%session_id, "position stream closed");
}
