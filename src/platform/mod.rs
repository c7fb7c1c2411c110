mod asus;
mod dmi;

use log::info;
use serde::Serialize;

use crate::errors::{FanControlError, Result};
use crate::fan::{Fan, FanIndex};
use crate::quirks::Quirk;

pub use asus::{AsusFanDriver, DEFAULT_FAN_MINIMUM};
pub use dmi::{read_identity, DMI_PATH};

/// Hwmon-style fan interface: the attribute set a `pwmN`/`fanN_*` layer needs.
pub trait FanController {
    /// Fans present on this platform, primary first.
    fn fans(&self) -> Vec<FanIndex>;

    /// Current commanded (manual) or sensed (automatic) speed, 0–255 scale.
    fn get_speed(&self, fan: FanIndex) -> Result<u32>;

    /// Set a speed (0–255), or 256 to return the fan to automatic control.
    fn set_speed(&self, fan: FanIndex, value: u32) -> Result<()>;

    /// Tachometer reading; 0 when firmware cannot provide one.
    fn get_tachometer(&self, fan: FanIndex) -> Result<u32>;

    fn get_label(&self, fan: FanIndex) -> Result<&'static str>;

    /// Floor reported to callers for this fan.
    fn get_minimum(&self, fan: FanIndex) -> Result<u32>;

    fn get_max_speed(&self) -> u32;

    /// Set the speed ceiling (0–255), or restore the factory one if `reset`.
    fn set_max_speed(&self, value: u32, reset: bool) -> Result<()>;

    /// Snapshot every present fan.
    fn discover(&self) -> Result<Vec<Fan>>;
}

/// What the identified machine offers; fixed after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub model: String,
    pub has_secondary_fan: bool,
    pub quirk: Quirk,
}

pub const ASUS_VENDOR: &str = "ASUSTeK COMPUTER INC.";

/// Models with only a CPU fan.
const SINGLE_FAN_MODELS: &[&str] = &[
    "UX31E", "UX21", "UX301LA", "UX21A", "UX31A", "UX32A", "UX42VS", "UX302LA", "N551JK",
    "N56JN",
];

/// Models with a dedicated graphics card and a second fan.
const DUAL_FAN_MODELS: &[&str] = &["UX32VD", "UX52VS", "UX500VZ", "NX500"];

fn quirk_for(product: &str) -> Quirk {
    match product {
        "N551JK" => Quirk::QuarterScale,
        _ => Quirk::Identity,
    }
}

/// Resolve a profile from DMI vendor/product strings. Unknown machines are
/// refused rather than driven with guessed parameters.
pub fn identify(vendor: &str, product: &str) -> Result<PlatformProfile> {
    let unrecognized = || FanControlError::UnrecognizedPlatform {
        vendor: vendor.to_string(),
        product: product.to_string(),
    };

    if vendor != ASUS_VENDOR {
        return Err(unrecognized());
    }

    let has_secondary_fan = if SINGLE_FAN_MODELS.contains(&product) {
        false
    } else if DUAL_FAN_MODELS.contains(&product) {
        info!("found dedicated gfx card on {} - second fan usable", product);
        true
    } else {
        return Err(unrecognized());
    };

    Ok(PlatformProfile {
        model: product.to_string(),
        has_secondary_fan,
        quirk: quirk_for(product),
    })
}
