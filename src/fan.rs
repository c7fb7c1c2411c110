use std::fmt;

use serde::Serialize;

use crate::errors::{FanControlError, Result};

/// Wire value that hands a fan back to firmware control.
pub const AUTOMATIC_SENTINEL: u32 = 256;

/// One of the (at most two) fans the firmware can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanIndex {
    Primary,
    Secondary,
}

impl FanIndex {
    pub const ALL: [FanIndex; 2] = [FanIndex::Primary, FanIndex::Secondary];

    /// Zero-based index used as the firmware argument for readback calls.
    pub fn as_index(self) -> usize {
        match self {
            FanIndex::Primary => 0,
            FanIndex::Secondary => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FanIndex::Primary => "CPU Fan",
            FanIndex::Secondary => "GFX Fan",
        }
    }
}

impl fmt::Display for FanIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanIndex::Primary => write!(f, "primary fan"),
            FanIndex::Secondary => write!(f, "secondary fan"),
        }
    }
}

/// What a fan is currently doing, as far as this process knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "speed")]
pub enum FanMode {
    /// Firmware thermal policy is in charge.
    #[default]
    Automatic,
    /// Pinned at the last commanded speed; firmware readback is not trusted.
    Manual(u8),
}

/// A requested transition for one fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetTarget {
    Automatic,
    Manual(u8),
}

impl SetTarget {
    /// Translate a hwmon-style `pwm` write (0–255, or 256 for automatic).
    pub fn from_wire(value: u32) -> Result<Self> {
        match value {
            AUTOMATIC_SENTINEL => Ok(SetTarget::Automatic),
            v => u8::try_from(v)
                .map(SetTarget::Manual)
                .map_err(|_| FanControlError::InvalidSpeed(v)),
        }
    }
}

/// Snapshot of a single fan, as reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Fan {
    pub index: FanIndex,
    /// Human-readable label ("CPU Fan" / "GFX Fan")
    pub label: &'static str,
    /// Commanded speed in manual mode, normalized firmware reading otherwise
    pub speed: u32,
    /// Tachometer reading (0 when unavailable)
    pub speed_rpm: u32,
    /// Floor reported to callers
    pub minimum: u32,
    pub mode: FanMode,
}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            FanMode::Automatic => "auto",
            FanMode::Manual(_) => "manual",
        };
        write!(
            f,
            "{}: speed {} ({} RPM) [{}]",
            self.label, self.speed, self.speed_rpm, mode
        )
    }
}
