//! # vskip Common Library
//!
//! Shared code for the vskip playback companion:
//! - Segment and episode identity types
//! - Event types (SkipEvent enum) and the event bus
//! - Error taxonomy
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod segments;

pub use error::{Error, Result};
pub use segments::{EpisodeIdentity, EpisodeMetadata, SegmentKind, SegmentSet, SegmentSource};
