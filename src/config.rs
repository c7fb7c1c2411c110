use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use asus_fan::firmware::ACPI_CALL_PATH;
use asus_fan::platform::{DEFAULT_FAN_MINIMUM, DMI_PATH};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/asus-fan/config.json";

fn default_acpi_call_path() -> PathBuf {
    PathBuf::from(ACPI_CALL_PATH)
}

fn default_dmi_path() -> PathBuf {
    PathBuf::from(DMI_PATH)
}

fn default_fan_minimum() -> u32 {
    DEFAULT_FAN_MINIMUM
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Request/reply file exposed by the acpi_call module
    #[serde(default = "default_acpi_call_path")]
    pub acpi_call_path: PathBuf,
    /// Directory holding `sys_vendor` and `product_name`
    #[serde(default = "default_dmi_path")]
    pub dmi_path: PathBuf,
    /// Floor reported for every fan
    #[serde(default = "default_fan_minimum")]
    pub fan_minimum: u32,
    /// Log to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acpi_call_path: default_acpi_call_path(),
            dmi_path: default_dmi_path(),
            fan_minimum: default_fan_minimum(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load `explicit` if given, else the system config if it exists, else
    /// defaults. An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let system = Path::new(SYSTEM_CONFIG_PATH);
                if system.exists() {
                    Self::from_file(system)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fan_minimum, 10);
        assert_eq!(config.acpi_call_path, PathBuf::from("/proc/acpi/call"));
    }

    #[test]
    fn fields_override_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "fan_minimum": 25, "dmi_path": "/tmp/dmi", "log_file": "/tmp/asus-fan.log" }"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.fan_minimum, 25);
        assert_eq!(config.dmi_path, PathBuf::from("/tmp/dmi"));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/asus-fan.log")));
        assert_eq!(config.acpi_call_path, PathBuf::from("/proc/acpi/call"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<Config, _> = serde_json::from_str(r#"{ "fan_max": 1 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load(Some(temp_dir.path().join("nope.json").as_path())).is_err());
    }
}
