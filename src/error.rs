//! Error types.
//!
//! The runtime is a soft real-time presentation loop, so very little is
//! fatal. Configuration and storage problems degrade to defaults at the call
//! site; the enum below exists so those call sites can log something precise.

use thiserror::Error;

/// Errors surfaced by the engine and its host capabilities.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A tween asked for an easing curve nobody registered.
    #[error("unknown easing curve '{0}'")]
    UnknownEasing(String),

    /// The INI configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The persistent score store could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    /// The window or graphics context could not be set up.
    #[error("host error: {0}")]
    Host(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;
