//! Builds the controller from configuration.

use crate::config::{Config, NotifierKind, ReaderKind};
use async_trait::async_trait;
use battery_threshold_core::ThresholdController;
use battery_threshold_executor::{CommandReader, DeviceReader, FileReader, PrivilegedTeeWriter};
use battery_threshold_interfaces::{DesktopNotifier, InterfaceError, Notifier, TerminalInterface};
use std::sync::Arc;

pub enum AppNotifier {
    Desktop(DesktopNotifier),
    Terminal(Arc<TerminalInterface>),
}

#[async_trait]
impl Notifier for AppNotifier {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError> {
        match self {
            AppNotifier::Desktop(notifier) => notifier.notify(message).await,
            AppNotifier::Terminal(terminal) => terminal.notify(message).await,
        }
    }
}

pub type AppController =
    ThresholdController<DeviceReader, PrivilegedTeeWriter, Arc<TerminalInterface>, AppNotifier>;

pub fn build_reader(config: &Config) -> DeviceReader {
    match config.reader {
        ReaderKind::Command => DeviceReader::Command(CommandReader::new(&config.read_command)),
        ReaderKind::File => DeviceReader::File(FileReader),
    }
}

pub fn build_writer(config: &Config) -> PrivilegedTeeWriter {
    PrivilegedTeeWriter::new(
        &config.privilege_helper,
        config.privilege_helper_args.clone(),
    )
}

pub fn build_notifier(config: &Config, terminal: &Arc<TerminalInterface>) -> AppNotifier {
    match config.notifier {
        NotifierKind::Desktop => AppNotifier::Desktop(DesktopNotifier::new()),
        NotifierKind::Terminal => AppNotifier::Terminal(Arc::clone(terminal)),
    }
}

/// Performs the initial device read as part of construction.
pub fn build_controller(config: &Config, terminal: Arc<TerminalInterface>) -> Arc<AppController> {
    let paths = config.device_paths();
    tracing::debug!(
        "Using {} (read) and {} (write)",
        paths.read.display(),
        paths.write.display()
    );
    let notifier = build_notifier(config, &terminal);
    Arc::new(ThresholdController::new(
        paths,
        build_reader(config),
        build_writer(config),
        terminal,
        notifier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use battery_threshold_core::BatteryId;
    use battery_threshold_interfaces::Indicator;

    fn sysfs(initial: &str) -> (tempfile::TempDir, Config) {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("BAT0")).unwrap();
        std::fs::write(
            root.path().join("BAT0").join("charge_control_end_threshold"),
            initial,
        )
        .unwrap();
        let config = Config {
            battery: BatteryId::new("BAT0").unwrap(),
            sysfs_root: root.path().to_path_buf(),
            reader: ReaderKind::File,
            privilege_helper: "env".to_string(),
            notifier: NotifierKind::Terminal,
            ..Config::default()
        };
        (root, config)
    }

    #[test]
    fn test_reader_selection() {
        let config = Config::default();
        assert!(matches!(build_reader(&config), DeviceReader::Command(_)));

        let config = Config {
            reader: ReaderKind::File,
            ..Config::default()
        };
        assert!(matches!(build_reader(&config), DeviceReader::File(_)));
    }

    #[test]
    fn test_writer_uses_configured_helper() {
        let config = Config {
            privilege_helper: "doas".to_string(),
            ..Config::default()
        };
        assert_eq!(build_writer(&config).helper(), "doas");
    }

    #[tokio::test]
    async fn test_controller_from_config() {
        let (_root, config) = sysfs("60\n");
        let terminal = Arc::new(TerminalInterface::new());
        let controller = build_controller(&config, Arc::clone(&terminal));

        assert_eq!(controller.label_text(), "Battery threshold: 60%");

        let outcome = controller
            .write_threshold(battery_threshold_core::Preset::Eighty.into())
            .await;
        assert!(outcome.is_success());
        assert_eq!(terminal.label(), "Battery threshold: 80%");
    }
}
