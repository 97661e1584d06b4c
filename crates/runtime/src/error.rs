//! Error types surfaced by the runtime.
//!
//! Engine failures never reach this layer: the engine reports telemetry
//! failures through its frame report and keeps running. What remains are the
//! file-backed concerns (settings, timing log, scenarios).
use std::path::PathBuf;

use thiserror::Error;

pub use parry_core::TelemetryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Failures loading or saving the persisted option set.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to encode settings: {0}")]
    Encode(String),

    #[error("settings lock was poisoned")]
    LockPoisoned,
}

/// Failures loading a replay scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario RON: {0}")]
    Parse(String),

    #[error("scenario step at frame {frame} comes after frame {previous}")]
    OutOfOrder { frame: u64, previous: u64 },
}
