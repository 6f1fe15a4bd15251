//! vskip-sim - scripted playback driver
//!
//! Stands in for a real host player: emits a session-start notification
//! for one episode, advances a simulated playback position on a timer,
//! and lets the real pipeline (metadata lookup, segment resolution,
//! skip monitor) react to it. With `--offline` the metadata lookup is
//! stubbed; otherwise a real TMDB lookup is issued and any failure
//! demonstrates the hard-fallback path.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vskip_agent::host::{HostEvent, PlayerHost, PlayerItem};
use vskip_agent::metadata::{SegmentProvider, StubProvider, TmdbClient};
use vskip_agent::surface::VideoSurface;
use vskip_agent::SkipPlugin;
use vskip_common::config::VskipConfig;
use vskip_common::events::{EventBus, SkipEvent};
use vskip_common::SegmentSet;

/// Command-line arguments for vskip-sim
#[derive(Parser, Debug)]
#[command(name = "vskip-sim")]
#[command(about = "Scripted playback driver for the vskip agent")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the standard lookup order)
    #[arg(short, long, env = "VSKIP_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the network and stub the metadata provider
    #[arg(long)]
    offline: bool,

    /// Stubbed episode runtime in minutes (with --offline)
    #[arg(long, default_value_t = 24.0)]
    runtime_minutes: f64,

    /// Series id to look up
    #[arg(long, default_value_t = 1399)]
    series: u64,

    /// Season number
    #[arg(long, default_value_t = 1)]
    season: u32,

    /// Episode number
    #[arg(long, default_value_t = 1)]
    episode: u32,

    /// Wall-clock interval between position updates
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Simulated playback seconds per tick
    #[arg(long, default_value_t = 15.0)]
    step_secs: f64,
}

/// Simulated video surface: an atomic position plus a broadcast stream
struct SimSurface {
    /// Current position as f64 bits
    position_bits: AtomicU64,
    position_tx: broadcast::Sender<f64>,
    seek_count: AtomicU64,
}

impl SimSurface {
    fn new() -> Self {
        let (position_tx, _) = broadcast::channel(64);
        Self {
            position_bits: AtomicU64::new(0f64.to_bits()),
            position_tx,
            seek_count: AtomicU64::new(0),
        }
    }

    /// Advance simulated playback and publish the new position
    fn advance(&self, step_secs: f64) -> f64 {
        let next = self.position() + step_secs;
        self.position_bits.store(next.to_bits(), Ordering::Relaxed);
        let _ = self.position_tx.send(next);
        next
    }

    fn seeks(&self) -> u64 {
        self.seek_count.load(Ordering::Relaxed)
    }
}

impl VideoSurface for SimSurface {
    fn position(&self) -> f64 {
        f64::from_bits(self.position_bits.load(Ordering::Relaxed))
    }

    fn seek(&self, position_secs: f64) -> vskip_common::Result<()> {
        self.position_bits
            .store(position_secs.to_bits(), Ordering::Relaxed);
        self.seek_count.fetch_add(1, Ordering::Relaxed);
        info!(to = position_secs, "surface seek");
        Ok(())
    }

    fn subscribe_position(&self) -> broadcast::Receiver<f64> {
        self.position_tx.subscribe()
    }
}

/// Simulated host: one notification channel, one surface
struct SimHost {
    tx: broadcast::Sender<HostEvent>,
    surface: Arc<SimSurface>,
}

impl SimHost {
    fn new(surface: Arc<SimSurface>) -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx, surface }
    }

    /// Wait until the controller has subscribed to notifications
    async fn ready(&self) {
        while self.tx.receiver_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn start_playback(&self, item: PlayerItem) {
        let _ = self.tx.send(HostEvent::PlaybackStarted { item });
    }
}

impl PlayerHost for SimHost {
    fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.tx.subscribe()
    }

    fn video_surface(&self) -> Option<Arc<dyn VideoSurface>> {
        Some(self.surface.clone())
    }
}

/// Wait for the monitor to arm and return the resolved segments
async fn wait_for_armed(rx: &mut broadcast::Receiver<SkipEvent>) -> Result<SegmentSet> {
    let armed = tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match rx.recv().await {
                Ok(SkipEvent::SegmentsResolved { segments, source, .. }) => {
                    return Ok((segments, source));
                }
                Ok(SkipEvent::SkipUnavailable { reason, .. }) => {
                    anyhow::bail!("skipping unavailable: {}", reason);
                }
                Ok(_) => continue,
                Err(e) => anyhow::bail!("event stream ended: {}", e),
            }
        }
    })
    .await
    .context("timed out waiting for the skip monitor to arm")?;

    let (segments, source) = armed?;
    info!(%source, ?segments, "monitor armed");
    Ok(segments)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vskip_agent=debug,vskip_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = VskipConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    let events = EventBus::new(config.events.capacity);

    let surface = Arc::new(SimSurface::new());
    let host = Arc::new(SimHost::new(surface.clone()));

    let provider: Arc<dyn SegmentProvider> = if args.offline {
        info!(runtime_minutes = args.runtime_minutes, "offline mode; metadata stubbed");
        Arc::new(StubProvider::with_runtime(args.runtime_minutes))
    } else {
        Arc::new(TmdbClient::from_config(&config.provider).context("Failed to build TMDB client")?)
    };

    // Exercise the no-registry fallback: init runs immediately
    let plugin = SkipPlugin::new(host.clone(), provider, events.clone());
    let controller_task = plugin
        .register(None)
        .context("direct init should return the controller task")?;

    // Log every bus event as it happens
    let mut log_rx = events.subscribe();
    let event_task = tokio::spawn(async move {
        while let Ok(event) = log_rx.recv().await {
            let payload = serde_json::to_string(&event).unwrap_or_default();
            info!(event = %event.event_type(), %payload, "bus event");
        }
    });

    let mut armed_rx = events.subscribe();
    host.ready().await;
    host.start_playback(PlayerItem {
        series_id: Some(args.series),
        season: Some(args.season),
        episode: Some(args.episode),
        title: None,
    });

    let segments = wait_for_armed(&mut armed_rx).await?;

    // Drive simulated playback to the end of the episode
    let tick = Duration::from_millis(args.tick_ms);
    loop {
        tokio::time::sleep(tick).await;
        let position = surface.advance(args.step_secs);
        if position >= segments.ending_end {
            break;
        }
    }

    // Let the final updates drain before reporting
    tokio::time::sleep(Duration::from_millis(200)).await;

    info!(
        seeks = surface.seeks(),
        final_position = surface.position(),
        "simulation complete"
    );

    event_task.abort();
    controller_task.abort();
    Ok(())
}
