//! Test infrastructure: scripted host and recording surface
//!
//! Spy-style stand-ins for the host player. The surface records every
//! seek it is asked to perform and lets tests feed position updates by
//! hand; the host emits notifications once the controller is known to
//! be listening.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;

use vskip_agent::host::{HostEvent, PlayerHost, PlayerItem};
use vskip_agent::surface::VideoSurface;
use vskip_common::events::SkipEvent;

/// Recording video surface
pub struct TestSurface {
    position_bits: AtomicU64,
    position_tx: broadcast::Sender<f64>,
    seeks: Mutex<Vec<f64>>,
}

impl TestSurface {
    pub fn new() -> Arc<Self> {
        let (position_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            position_bits: AtomicU64::new(0f64.to_bits()),
            position_tx,
            seeks: Mutex::new(Vec::new()),
        })
    }

    /// Deliver one position update to subscribers
    pub fn feed(&self, position: f64) {
        self.position_bits.store(position.to_bits(), Ordering::Relaxed);
        let _ = self.position_tx.send(position);
    }

    /// Every seek issued so far, in order
    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().unwrap().clone()
    }
}

impl VideoSurface for TestSurface {
    fn position(&self) -> f64 {
        f64::from_bits(self.position_bits.load(Ordering::Relaxed))
    }

    fn seek(&self, position_secs: f64) -> vskip_common::Result<()> {
        self.position_bits
            .store(position_secs.to_bits(), Ordering::Relaxed);
        self.seeks.lock().unwrap().push(position_secs);
        Ok(())
    }

    fn subscribe_position(&self) -> broadcast::Receiver<f64> {
        self.position_tx.subscribe()
    }
}

/// Scripted host player
pub struct TestHost {
    tx: broadcast::Sender<HostEvent>,
    surface: Option<Arc<TestSurface>>,
}

impl TestHost {
    pub fn with_surface(surface: Arc<TestSurface>) -> Arc<Self> {
        let (tx, _) = broadcast::channel(16);
        Arc::new(Self {
            tx,
            surface: Some(surface),
        })
    }

    pub fn without_surface() -> Arc<Self> {
        let (tx, _) = broadcast::channel(16);
        Arc::new(Self { tx, surface: None })
    }

    /// Emit a playback-started notification once the controller listens
    pub async fn start_playback(&self, item: PlayerItem) {
        self.ready().await;
        let _ = self.tx.send(HostEvent::PlaybackStarted { item });
    }

    /// Emit a teardown notification
    pub async fn stop_playback(&self) {
        self.ready().await;
        let _ = self.tx.send(HostEvent::PlaybackStopped);
    }

    async fn ready(&self) {
        while self.tx.receiver_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl PlayerHost for TestHost {
    fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.tx.subscribe()
    }

    fn video_surface(&self) -> Option<Arc<dyn VideoSurface>> {
        self.surface.clone().map(|s| s as Arc<dyn VideoSurface>)
    }
}

/// Item payload with a complete identity
pub fn item(series_id: u64, season: u32, episode: u32) -> PlayerItem {
    PlayerItem {
        series_id: Some(series_id),
        season: Some(season),
        episode: Some(episode),
        title: None,
    }
}

/// Await the next event of the given type, skipping others
pub async fn expect_event(
    rx: &mut broadcast::Receiver<SkipEvent>,
    event_type: &str,
) -> SkipEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(event) if event.event_type() == event_type => return event,
                Ok(_) => continue,
                Err(e) => panic!("event stream ended while waiting for {}: {}", event_type, e),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {}", event_type))
}

/// Assert no event of the given type arrives within the window
pub async fn expect_no_event(
    rx: &mut broadcast::Receiver<SkipEvent>,
    event_type: &str,
    window: Duration,
) {
    let result = tokio::time::timeout(window, async {
        loop {
            match rx.recv().await {
                Ok(event) if event.event_type() == event_type => return event,
                Ok(_) => continue,
                // Stream closed: nothing more can arrive, wait out the window
                Err(_) => std::future::pending::<()>().await,
            }
        }
    })
    .await;

    if let Ok(event) = result {
        panic!("unexpected {} event: {:?}", event_type, event);
    }
}
