//! Error types
//!
//! Only startup failures are fatal. Output and telemetry errors are logged by
//! the orchestrator and never stop a session.

use std::path::PathBuf;

/// Fatal errors surfaced before the game loop starts
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The camera / tracking source could not be opened
    #[error("capture source unavailable: {reason}")]
    CaptureUnavailable {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },
    /// Settings file could not be read
    #[error("failed to read settings from {}: {source}", path.display())]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Settings file is not valid JSON for [`crate::Settings`]
    #[error("invalid settings in {}: {source}", path.display())]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rendering or audio failure (non-fatal)
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("render failed: {0}")]
    Render(String),
    #[error("audio failed: {0}")]
    Audio(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Summary delivery failure (non-fatal, never retried)
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to encode session summary: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write session summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry endpoint rejected summary: {0}")]
    Rejected(String),
}
