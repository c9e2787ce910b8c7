use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/power_supply";
pub const DEFAULT_ATTRIBUTE: &str = "charge_control_end_threshold";
pub const DEFAULT_BATTERY: &str = "BAT0";

/// A charge-control end threshold as reported by the device.
///
/// Holds the raw text with surrounding whitespace removed. No numeric
/// parsing is applied, the device is the authority on what it returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Threshold(String);

impl Threshold {
    /// Returns `None` when nothing is left after trimming.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Preset> for Threshold {
    fn from(preset: Preset) -> Self {
        Self(preset.value().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSource {
    DeviceRead,
    PendingWrite,
}

/// The fixed set of thresholds offered in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Sixty,
    Eighty,
    Hundred,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Sixty, Preset::Eighty, Preset::Hundred];

    pub fn value(self) -> &'static str {
        match self {
            Preset::Sixty => "60",
            Preset::Eighty => "80",
            Preset::Hundred => "100",
        }
    }

    pub fn menu_label(self) -> String {
        format!("Set threshold to {}%", self.value())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.value())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let value = value.strip_suffix('%').unwrap_or(value);
        Preset::ALL
            .into_iter()
            .find(|preset| preset.value() == value)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Power-supply name such as `BAT0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatteryId(String);

impl BatteryId {
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() || !id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(ConfigError::InvalidBattery(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BatteryId {
    fn default() -> Self {
        Self(DEFAULT_BATTERY.to_string())
    }
}

impl TryFrom<String> for BatteryId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BatteryId> for String {
    fn from(id: BatteryId) -> Self {
        id.0
    }
}

impl fmt::Display for BatteryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The sysfs file pair the controller reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePaths {
    pub read: PathBuf,
    pub write: PathBuf,
}

impl DevicePaths {
    /// Same battery for both directions.
    pub fn for_battery(root: impl AsRef<Path>, attribute: &str, battery: &BatteryId) -> Self {
        Self::split(root, attribute, battery, battery)
    }

    /// Separate batteries for read and write.
    pub fn split(
        root: impl AsRef<Path>,
        attribute: &str,
        read: &BatteryId,
        write: &BatteryId,
    ) -> Self {
        let root = root.as_ref();
        Self {
            read: root.join(read.as_str()).join(attribute),
            write: root.join(write.as_str()).join(attribute),
        }
    }

    pub fn is_split(&self) -> bool {
        self.read != self.write
    }
}

impl Default for DevicePaths {
    fn default() -> Self {
        Self::for_battery(DEFAULT_SYSFS_ROOT, DEFAULT_ATTRIBUTE, &BatteryId::default())
    }
}

pub fn label_text(threshold: Option<&Threshold>) -> String {
    match threshold {
        Some(threshold) => format!("Battery threshold: {}%", threshold),
        None => "Battery threshold: unavailable".to_string(),
    }
}

pub fn set_notification_text(threshold: &Threshold) -> String {
    format!("Battery threshold set to {}%", threshold)
}

pub fn current_notification_text(threshold: Option<&Threshold>) -> String {
    match threshold {
        Some(threshold) => format!("Current threshold: {}%", threshold),
        None => "Current threshold: unavailable".to_string(),
    }
}
