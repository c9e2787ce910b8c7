use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Notification backend unavailable: {0}")]
    Unavailable(String),
    #[error("Notification failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent status label, the panel indicator text.
pub trait Indicator: Send + Sync {
    fn set_label(&self, text: &str);
    fn label(&self) -> String;
}

/// One-shot, transient user notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError>;
}

impl<T: Indicator + ?Sized> Indicator for std::sync::Arc<T> {
    fn set_label(&self, text: &str) {
        (**self).set_label(text)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError> {
        (**self).notify(message).await
    }
}
