//! # vskip Agent Library (vskip-agent)
//!
//! Playback companion that skips opening titles and closing credits.
//!
//! **Purpose:** Resolve intro/ending segment boundaries for the episode
//! now playing (provider lookup with deterministic fallback), watch the
//! playback position, and seek past each segment exactly once per
//! session.
//!
//! **Architecture:** Event-driven and push-based. The host delivers
//! session-start notifications, the video surface delivers position
//! updates; the agent never polls.

pub mod host;
pub mod metadata;
pub mod monitor;
pub mod plugin;
pub mod resolve;
pub mod session;
pub mod surface;

pub use plugin::SkipPlugin;
pub use session::SessionController;
pub use vskip_common::{Error, Result};
