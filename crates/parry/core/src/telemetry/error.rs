use thiserror::Error;

/// Errors raised while persisting a timing record.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("telemetry sink unavailable: {0}")]
    Unavailable(String),
}
