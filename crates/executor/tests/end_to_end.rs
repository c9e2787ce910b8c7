use async_trait::async_trait;
use battery_threshold_core::*;
use battery_threshold_executor::*;
use battery_threshold_interfaces::{Indicator, InterfaceError, Notifier};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    label: Mutex<String>,
    messages: Mutex<Vec<String>>,
}

impl Indicator for Recorder {
    fn set_label(&self, text: &str) {
        *self.label.lock() = text.to_string();
    }

    fn label(&self) -> String {
        self.label.lock().clone()
    }
}

#[async_trait]
impl Notifier for Recorder {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError> {
        self.messages.lock().push(message.to_string());
        Ok(())
    }
}

fn sysfs_fixture(initial: &str) -> (tempfile::TempDir, DevicePaths) {
    let root = tempfile::tempdir().unwrap();
    let battery = BatteryId::new("BAT0").unwrap();
    std::fs::create_dir_all(root.path().join("BAT0")).unwrap();
    let paths = DevicePaths::for_battery(root.path(), DEFAULT_ATTRIBUTE, &battery);
    std::fs::write(&paths.read, initial).unwrap();
    (root, paths)
}

#[tokio::test]
async fn test_write_then_verify_against_real_files() {
    let (_root, paths) = sysfs_fixture("60\n");
    let recorder = Arc::new(Recorder::default());
    let controller = ThresholdController::new(
        paths.clone(),
        DeviceReader::Command(CommandReader::default()),
        PrivilegedTeeWriter::new("env", Vec::new()),
        Arc::clone(&recorder),
        Arc::clone(&recorder),
    );
    assert_eq!(recorder.label(), "Battery threshold: 60%");

    let outcome = controller.write_threshold(Preset::Eighty.into()).await;

    assert!(matches!(outcome, WriteOutcome::Verified(_)));
    assert_eq!(std::fs::read_to_string(&paths.write).unwrap(), "80\n");
    assert_eq!(recorder.label(), "Battery threshold: 80%");
    assert_eq!(
        recorder.messages.lock().clone(),
        vec!["Battery threshold set to 80%"]
    );
}

#[tokio::test]
async fn test_failing_helper_keeps_label() {
    let (_root, paths) = sysfs_fixture("60\n");
    let recorder = Arc::new(Recorder::default());
    let controller = ThresholdController::new(
        paths.clone(),
        FileReader,
        PrivilegedTeeWriter::new("false", Vec::new()),
        Arc::clone(&recorder),
        Arc::clone(&recorder),
    );

    let outcome = controller.write_threshold(Preset::Hundred.into()).await;

    assert!(matches!(
        outcome,
        WriteOutcome::Failed(ExecutionError::Failed { .. })
    ));
    assert_eq!(std::fs::read_to_string(&paths.read).unwrap(), "60\n");
    assert_eq!(recorder.label(), "Battery threshold: 60%");
    assert!(recorder.messages.lock().is_empty());
}

#[tokio::test]
async fn test_missing_attribute_is_unavailable() {
    let root = tempfile::tempdir().unwrap();
    let paths = DevicePaths::for_battery(
        root.path(),
        DEFAULT_ATTRIBUTE,
        &BatteryId::new("BAT0").unwrap(),
    );
    let recorder = Arc::new(Recorder::default());
    let controller = ThresholdController::new(
        paths,
        FileReader,
        PrivilegedTeeWriter::new("env", Vec::new()),
        Arc::clone(&recorder),
        Arc::clone(&recorder),
    );

    assert_eq!(recorder.label(), "Battery threshold: unavailable");
    assert!(controller.show_current().await.is_err());
    assert_eq!(
        recorder.messages.lock().clone(),
        vec!["Current threshold: unavailable"]
    );
}
