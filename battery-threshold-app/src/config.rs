use anyhow::{bail, Context, Result};
use battery_threshold_core::{
    BatteryId, DevicePaths, DEFAULT_ATTRIBUTE, DEFAULT_SYSFS_ROOT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BATTERY_THRESHOLD_CONFIG";
pub const BATTERY_ENV: &str = "BATTERY_THRESHOLD_BATTERY";
pub const HELPER_ENV: &str = "BATTERY_THRESHOLD_HELPER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderKind {
    Command,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    Desktop,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub battery: BatteryId,
    /// Writes go to this battery instead of `battery` when set.
    pub write_battery: Option<BatteryId>,
    pub sysfs_root: PathBuf,
    pub attribute: String,
    pub reader: ReaderKind,
    pub read_command: String,
    pub privilege_helper: String,
    pub privilege_helper_args: Vec<String>,
    pub notifier: NotifierKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            battery: BatteryId::default(),
            write_battery: None,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            reader: ReaderKind::Command,
            read_command: "cat".to_string(),
            privilege_helper: "pkexec".to_string(),
            privilege_helper_args: Vec::new(),
            notifier: NotifierKind::Desktop,
        }
    }
}

impl Config {
    /// Resolves the config file location from the given environment lookup.
    pub fn path_from<F>(lookup: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        let base = lookup("XDG_CONFIG_HOME")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("battery-threshold").join("config.yaml"))
    }

    pub fn path() -> Option<PathBuf> {
        Self::path_from(|key| std::env::var(key).ok())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Loads the file if present, otherwise defaults, then applies
    /// environment overrides and validates.
    pub fn resolve() -> Result<Self> {
        let mut config = match Self::path() {
            Some(path) if path.exists() => Self::load(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(battery) = lookup(BATTERY_ENV).filter(|v| !v.is_empty()) {
            self.battery = BatteryId::new(battery).context("Invalid BATTERY_THRESHOLD_BATTERY")?;
        }
        if let Some(helper) = lookup(HELPER_ENV).filter(|v| !v.is_empty()) {
            self.privilege_helper = helper;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.attribute.trim().is_empty() || self.attribute.contains('/') {
            bail!("attribute must be a plain file name, got {:?}", self.attribute);
        }
        if self.privilege_helper.trim().is_empty() {
            bail!("privilege_helper cannot be empty");
        }
        if self.reader == ReaderKind::Command && self.read_command.trim().is_empty() {
            bail!("read_command cannot be empty when reader is 'command'");
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn device_paths(&self) -> DevicePaths {
        match &self.write_battery {
            Some(write) => {
                DevicePaths::split(&self.sysfs_root, &self.attribute, &self.battery, write)
            }
            None => DevicePaths::for_battery(&self.sysfs_root, &self.attribute, &self.battery),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_path_prefers_explicit_override() {
        let path = Config::path_from(env(&[
            (CONFIG_ENV, "/etc/bt.yaml"),
            ("HOME", "/home/user"),
        ]));
        assert_eq!(path, Some(PathBuf::from("/etc/bt.yaml")));
    }

    #[test]
    fn test_path_uses_xdg_then_home() {
        let xdg = Config::path_from(env(&[("XDG_CONFIG_HOME", "/cfg"), ("HOME", "/home/user")]));
        assert_eq!(
            xdg,
            Some(PathBuf::from("/cfg/battery-threshold/config.yaml"))
        );

        let home = Config::path_from(env(&[("HOME", "/home/user")]));
        assert_eq!(
            home,
            Some(PathBuf::from(
                "/home/user/.config/battery-threshold/config.yaml"
            ))
        );

        assert_eq!(Config::path_from(env(&[])), None);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[(BATTERY_ENV, "BAT1"), (HELPER_ENV, "sudo")]))
            .unwrap();
        assert_eq!(config.battery.as_str(), "BAT1");
        assert_eq!(config.privilege_helper, "sudo");
    }

    #[test]
    fn test_invalid_battery_override() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(env(&[(BATTERY_ENV, "../BAT0")]))
            .is_err());
    }

    #[test]
    fn test_validate_rejects_bad_attribute() {
        let config = Config {
            attribute: "../capacity".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_paths_share_battery() {
        let paths = Config::default().device_paths();
        assert!(!paths.is_split());
        assert_eq!(
            paths.read,
            PathBuf::from("/sys/class/power_supply/BAT0/charge_control_end_threshold")
        );
    }
}
