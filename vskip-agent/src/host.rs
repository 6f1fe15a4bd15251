//! Host player interface
//!
//! The host tells the agent when a new playback session starts and
//! hands out the video surface for the item now playing. Both arrive
//! through explicit interfaces rather than ambient globals, so tests
//! and the sim binary can stand in for a real player.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use vskip_common::{EpisodeIdentity, Error, Result};

use crate::surface::VideoSurface;

/// Item payload attached to a playback notification
///
/// Hosts populate what they know; all fields are optional here and
/// validated by `identity()` before a session is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerItem {
    /// Series id in the metadata provider's namespace
    pub series_id: Option<u64>,
    /// Season number
    pub season: Option<u32>,
    /// Episode number within the season
    pub episode: Option<u32>,
    /// Display title, for logging only
    pub title: Option<String>,
}

impl PlayerItem {
    /// Extract a validated episode identity
    ///
    /// Every field must be present and strictly positive; anything else
    /// aborts session setup with `MissingIdentity`.
    pub fn identity(&self) -> Result<EpisodeIdentity> {
        let series_id = self
            .series_id
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::MissingIdentity("series id".to_string()))?;
        let season = self
            .season
            .filter(|s| *s > 0)
            .ok_or_else(|| Error::MissingIdentity("season".to_string()))?;
        let episode = self
            .episode
            .filter(|e| *e > 0)
            .ok_or_else(|| Error::MissingIdentity("episode".to_string()))?;

        Ok(EpisodeIdentity {
            series_id,
            season,
            episode,
        })
    }
}

/// Notifications delivered by the host
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A new playback session is ready/starting
    ///
    /// Always supersedes the previous session, if any.
    PlaybackStarted { item: PlayerItem },

    /// The player was torn down without starting a new session
    PlaybackStopped,
}

/// The host player as seen by the agent
pub trait PlayerHost: Send + Sync {
    /// Subscribe to host notifications
    fn subscribe(&self) -> broadcast::Receiver<HostEvent>;

    /// The video surface for the item now playing, if one exists
    fn video_surface(&self) -> Option<Arc<dyn VideoSurface>>;
}
