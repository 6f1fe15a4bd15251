//! Common error types for vskip

use thiserror::Error;

/// Common result type for vskip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the vskip crates
///
/// Nothing here is fatal to the host player: every variant degrades to
/// either "fallback segments used" or "skipping disabled for this
/// session" at the point where it is handled.
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata request rejected or timed out
    #[error("Network failure: {0}")]
    Network(String),

    /// Non-success status or unparseable metadata body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session payload lacks a usable episode identity
    #[error("Missing identity: {0}")]
    MissingIdentity(String),

    /// Video element/stream not found when monitor setup was attempted
    #[error("No video surface available")]
    NoVideoSurface,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
