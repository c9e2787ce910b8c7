use crate::error::{DeviceError, ExecutionError};
use async_trait::async_trait;
use std::path::Path;

/// Reads the raw contents of a device attribute.
///
/// Implementations block the calling thread for the duration of the read.
/// That is acceptable for sysfs attributes, which are served from memory by
/// the kernel, but callers on an async runtime should keep it in mind.
pub trait ThresholdReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, DeviceError>;
}

/// Writes a device attribute with elevated privilege.
///
/// May prompt the user for credentials and has no timeout.
#[async_trait]
pub trait ElevatedWriter: Send + Sync {
    async fn write(&self, path: &Path, value: &str) -> Result<(), ExecutionError>;
}

impl<T: ThresholdReader + ?Sized> ThresholdReader for std::sync::Arc<T> {
    fn read(&self, path: &Path) -> Result<String, DeviceError> {
        (**self).read(path)
    }
}

#[async_trait]
impl<T: ElevatedWriter + ?Sized> ElevatedWriter for std::sync::Arc<T> {
    async fn write(&self, path: &Path, value: &str) -> Result<(), ExecutionError> {
        (**self).write(path, value).await
    }
}
