//! Machine identity strings from the DMI sysfs directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{FanControlError, Result};

pub const DMI_PATH: &str = "/sys/class/dmi/id";

/// Read `(sys_vendor, product_name)` from a DMI sysfs directory.
pub fn read_identity(dmi_dir: &Path) -> Result<(String, String)> {
    let vendor = read_dmi_string(&dmi_dir.join("sys_vendor"))?;
    let product = read_dmi_string(&dmi_dir.join("product_name"))?;
    Ok((vendor, product))
}

fn read_dmi_string(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::PermissionDenied => {
            FanControlError::PermissionDenied(format!("{}: {}", path.display(), error))
        }
        _ => FanControlError::Io(error),
    })?;
    Ok(content.trim().to_string())
}
