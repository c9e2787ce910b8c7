//! Privileged attribute writes through an elevation helper.
//!
//! Runs `<helper> [args] tee <path>` and feeds the value on stdin. The value
//! is never placed on a shell command line.

use async_trait::async_trait;
use battery_threshold_core::{ElevatedWriter, ExecutionError};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub struct PrivilegedTeeWriter {
    helper: String,
    helper_args: Vec<String>,
    tee: String,
}

impl PrivilegedTeeWriter {
    pub fn new(helper: impl Into<String>, helper_args: Vec<String>) -> Self {
        Self {
            helper: helper.into(),
            helper_args,
            tee: "tee".to_string(),
        }
    }

    pub fn pkexec() -> Self {
        Self::new("pkexec", Vec::new())
    }

    pub fn helper(&self) -> &str {
        &self.helper
    }

    fn validate_value(value: &str) -> Result<(), ExecutionError> {
        if value.is_empty() || value.contains(['\0', '\n']) {
            return Err(ExecutionError::Stdin(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "value must be a single non-empty line",
            )));
        }
        Ok(())
    }
}

impl Default for PrivilegedTeeWriter {
    fn default() -> Self {
        Self::pkexec()
    }
}

#[async_trait]
impl ElevatedWriter for PrivilegedTeeWriter {
    async fn write(&self, path: &Path, value: &str) -> Result<(), ExecutionError> {
        Self::validate_value(value)?;

        tracing::info!(
            "Executing command: {} {:?} {} {}",
            self.helper,
            self.helper_args,
            self.tee,
            path.display()
        );

        let mut child = Command::new(&self.helper)
            .args(&self.helper_args)
            .arg(&self.tee)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecutionError::Launch)?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = match stdin.write_all(format!("{}\n", value).as_bytes()).await {
                Ok(()) => stdin.shutdown().await,
                Err(e) => Err(e),
            };
            match written {
                Ok(()) => {}
                // Helper exited before reading; its exit status tells why.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("Privilege helper closed stdin early: {}", e);
                }
                Err(e) => {
                    if let Err(kill_err) = child.kill().await {
                        tracing::warn!("Failed to stop privilege helper: {}", kill_err);
                    }
                    return Err(ExecutionError::Stdin(e));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(ExecutionError::Launch)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ExecutionError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
