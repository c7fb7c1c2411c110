//! Firmware transport over the `acpi_call` module's proc file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::FirmwareTransport;
use crate::errors::{FanControlError, Result};

pub const ACPI_CALL_PATH: &str = "/proc/acpi/call";

/// Firmware transport backed by the `acpi_call` kernel module.
///
/// A request is written to `/proc/acpi/call` as `"<method> <arg>..."` and the
/// result is read back from the same file.
pub struct AcpiCallTransport {
    call_path: PathBuf,
}

impl AcpiCallTransport {
    /// Create a transport using the default `/proc/acpi/call` path.
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(ACPI_CALL_PATH))
    }

    /// Create a transport rooted at a custom path (useful for testing).
    pub fn with_path(call_path: PathBuf) -> Self {
        Self { call_path }
    }
}

impl Default for AcpiCallTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FirmwareTransport for AcpiCallTransport {
    fn evaluate(&mut self, method: &str, args: &[u64]) -> Result<u64> {
        let request = format_request(method, args);
        fs::write(&self.call_path, &request).map_err(|error| map_io_error(error, &self.call_path))?;
        let reply =
            fs::read_to_string(&self.call_path).map_err(|error| map_io_error(error, &self.call_path))?;
        parse_reply(method, &reply)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn format_request(method: &str, args: &[u64]) -> String {
    let mut request = method.to_string();
    for arg in args {
        request.push_str(&format!(" {:#x}", arg));
    }
    request
}

/// Interpret what `acpi_call` left in its buffer after a call.
fn parse_reply(method: &str, reply: &str) -> Result<u64> {
    let reply = reply.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    if let Some(status) = reply.strip_prefix("Error:") {
        return Err(FanControlError::Firmware {
            method: method.to_string(),
            status: status.trim().to_string(),
        });
    }

    let parsed = match reply.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => reply.parse::<u64>().ok(),
    };
    parsed.ok_or_else(|| {
        FanControlError::Transport(format!("unexpected reply to {}: '{}'", method, reply))
    })
}

fn map_io_error(error: std::io::Error, path: &Path) -> FanControlError {
    match error.kind() {
        ErrorKind::NotFound => FanControlError::Transport(format!(
            "{} not found: is the acpi_call module loaded?",
            path.display()
        )),
        ErrorKind::PermissionDenied => {
            FanControlError::PermissionDenied(format!("{}: {}", path.display(), error))
        }
        _ => FanControlError::Io(error),
    }
}
