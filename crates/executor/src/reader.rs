//! Blocking readers for device attributes.

use battery_threshold_core::{DeviceError, ThresholdReader};
use std::path::Path;
use std::process::Command;

/// Reads an attribute by running an external command, `cat` by default.
pub struct CommandReader {
    program: String,
}

impl CommandReader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandReader {
    fn default() -> Self {
        Self::new("cat")
    }
}

impl ThresholdReader for CommandReader {
    fn read(&self, path: &Path) -> Result<String, DeviceError> {
        tracing::debug!("Executing command: {} {}", self.program, path.display());

        let output = Command::new(&self.program).arg(path).output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(DeviceError::ReadFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// Reads an attribute directly from the filesystem.
#[derive(Default)]
pub struct FileReader;

impl ThresholdReader for FileReader {
    fn read(&self, path: &Path) -> Result<String, DeviceError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Reader selected at runtime from configuration.
pub enum DeviceReader {
    Command(CommandReader),
    File(FileReader),
}

impl ThresholdReader for DeviceReader {
    fn read(&self, path: &Path) -> Result<String, DeviceError> {
        match self {
            DeviceReader::Command(reader) => reader.read(path),
            DeviceReader::File(reader) => reader.read(path),
        }
    }
}
