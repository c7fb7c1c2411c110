//! Per-platform corrections applied to raw speed readings.
//!
//! The same firmware namespace is shared across models that disagree on the
//! scale `RFAN` reports in versus the scale `SFNV` accepts. Only corrections
//! verified on real hardware belong here; everything else reads as identity.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quirk {
    #[default]
    Identity,
    /// Readback is a quarter of the write scale, off by one (N551JK).
    QuarterScale,
}

/// Highest value a normalized reading may take. 256 is the automatic-mode
/// request on the write side and must never come back from a read.
pub const MAX_READING: u32 = 255;

/// Bring a raw `RFAN` value onto the same 0–255 scale used for writes.
pub fn normalize_read(raw: u64, quirk: Quirk) -> u32 {
    let value = match quirk {
        Quirk::Identity => raw,
        Quirk::QuarterScale => raw.saturating_add(1).saturating_mul(4),
    };
    value.min(u64::from(MAX_READING)) as u32
}
