//! Errors raised at the edges of the engine. The simulation itself cannot fail.

use std::path::PathBuf;

/// Result alias for fallible engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while configuring the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The settings file could not be read.
    #[error("failed to read settings from {}: {source}", path.display())]
    ConfigIo {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON for [`Settings`](super::config::Settings).
    #[error("invalid settings: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
