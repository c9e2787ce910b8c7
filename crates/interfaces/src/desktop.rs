//! Desktop notifications through the freedesktop `notify-send` client.

use crate::traits::{InterfaceError, Notifier};
use async_trait::async_trait;
use tokio::process::Command;

pub const DEFAULT_APP_NAME: &str = "battery-threshold";

pub struct DesktopNotifier {
    program: String,
    app_name: String,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::with_program("notify-send")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn validate_message(message: &str) -> Result<(), InterfaceError> {
        if message.contains('\0') {
            return Err(InterfaceError::Failed(
                "message contains null byte".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError> {
        Self::validate_message(message)?;

        let output = Command::new(&self.program)
            .arg(format!("--app-name={}", self.app_name))
            .arg(message)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => InterfaceError::Unavailable(format!(
                    "'{}' not found (install libnotify)",
                    self.program
                )),
                _ => InterfaceError::Io(e),
            })?;

        if output.status.success() {
            tracing::debug!("Desktop notification sent: {}", message);
            return Ok(());
        }
        Err(InterfaceError::Failed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_backend_is_unavailable() {
        let notifier = DesktopNotifier::with_program("definitely-not-a-notifier-binary");
        let result = notifier.notify("Battery threshold set to 80%").await;
        assert!(matches!(result, Err(InterfaceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_successful_backend() {
        let notifier = DesktopNotifier::with_program("true");
        assert!(notifier.notify("Current threshold: 80%").await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let notifier = DesktopNotifier::with_program("false");
        let result = notifier.notify("Current threshold: 80%").await;
        assert!(matches!(result, Err(InterfaceError::Failed(_))));
    }

    #[tokio::test]
    async fn test_null_byte_rejected() {
        let notifier = DesktopNotifier::with_program("true");
        let result = notifier.notify("bad\0message").await;
        assert!(matches!(result, Err(InterfaceError::Failed(_))));
    }
}
