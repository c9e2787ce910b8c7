use std::path::PathBuf;
use thiserror::Error;

/// Failure of the low-level device read.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Read failed: {0}")]
    ReadFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
    #[error("Empty reading from {}", .0.display())]
    EmptyReading(PathBuf),
}

/// Failure of the privileged write.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to launch privilege helper: {0}")]
    Launch(std::io::Error),
    #[error("Failed to pass value to privilege helper: {0}")]
    Stdin(std::io::Error),
    #[error("Privileged write failed (exit code {code:?}): {stderr}")]
    Failed { code: Option<i32>, stderr: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid battery identifier: {0:?}")]
    InvalidBattery(String),
    #[error("Unknown preset: {0:?} (expected 60, 80 or 100)")]
    UnknownPreset(String),
}
