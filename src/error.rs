//! Error types
//!
//! Tracker and runtime operations never fail; only configuration, replay
//! file IO and driver construction can produce an error.

use thiserror::Error;

/// Errors that can occur while loading configuration or running tools
#[derive(Error, Debug)]
pub enum AuraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("Frame driver interval must be greater than zero")]
    DriverInterval,
}

/// Result type for fallible aura operations
pub type AuraResult<T> = Result<T, AuraError>;
