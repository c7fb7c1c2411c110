//! ASUS notebook fan driver backed by ACPI methods in the EC and ATKD
//! namespaces.
//!
//! Activation and deactivation both force every fan back to automatic
//! control with the factory ceiling, so a previous instance that died with a
//! fan pinned cannot leave the machine running on a stale manual speed.

use log::{info, warn};

use super::{FanController, PlatformProfile};
use crate::controller::FanControl;
use crate::errors::{FanControlError, Result};
use crate::fan::{Fan, FanIndex, SetTarget};
use crate::firmware::{FirmwareGateway, FirmwareTransport};

/// Reported floor when none is configured.
pub const DEFAULT_FAN_MINIMUM: u32 = 10;

pub struct AsusFanDriver {
    control: FanControl,
    fan_minimum: u32,
    active: bool,
}

impl AsusFanDriver {
    /// Take control of the fans: reset them to automatic mode and restore
    /// the default ceiling.
    pub fn activate(
        profile: PlatformProfile,
        transport: Box<dyn FirmwareTransport>,
        fan_minimum: u32,
    ) -> Result<Self> {
        let control = FanControl::new(profile, FirmwareGateway::new(transport));
        control.reset()?;
        info!(
            "asus-fan active on {} ({} fan{})",
            control.profile().model,
            if control.profile().has_secondary_fan { 2 } else { 1 },
            if control.profile().has_secondary_fan { "s" } else { "" }
        );
        Ok(Self {
            control,
            fan_minimum,
            active: true,
        })
    }

    pub fn profile(&self) -> &PlatformProfile {
        self.control.profile()
    }

    pub fn control(&self) -> &FanControl {
        &self.control
    }

    /// Hand the fans back to firmware. Also runs on drop if not called.
    pub fn shutdown(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.control.reset()?;
        info!("asus-fan shut down, fans handed back to firmware");
        Ok(())
    }
}

impl Drop for AsusFanDriver {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            warn!("failed to reset fans on shutdown: {}", error);
        }
    }
}

impl FanController for AsusFanDriver {
    fn fans(&self) -> Vec<FanIndex> {
        FanIndex::ALL
            .into_iter()
            .filter(|fan| self.control.check_fan(*fan).is_ok())
            .collect()
    }

    fn get_speed(&self, fan: FanIndex) -> Result<u32> {
        self.control.get_state(fan)
    }

    fn set_speed(&self, fan: FanIndex, value: u32) -> Result<()> {
        self.control.check_fan(fan)?;
        let target = SetTarget::from_wire(value)?;
        self.control.set_state(fan, target)
    }

    fn get_tachometer(&self, fan: FanIndex) -> Result<u32> {
        self.control.check_fan(fan)?;
        Ok(self.control.gateway().read_tachometer(fan))
    }

    fn get_label(&self, fan: FanIndex) -> Result<&'static str> {
        self.control.check_fan(fan)?;
        Ok(fan.label())
    }

    fn get_minimum(&self, fan: FanIndex) -> Result<u32> {
        self.control.check_fan(fan)?;
        Ok(self.fan_minimum)
    }

    fn get_max_speed(&self) -> u32 {
        u32::from(self.control.get_max_speed())
    }

    fn set_max_speed(&self, value: u32, reset: bool) -> Result<()> {
        if reset {
            return self.control.set_max_speed(0, true);
        }
        let value = u8::try_from(value).map_err(|_| FanControlError::InvalidSpeed(value))?;
        self.control.set_max_speed(value, false)
    }

    fn discover(&self) -> Result<Vec<Fan>> {
        self.fans()
            .into_iter()
            .map(|fan| -> Result<Fan> {
                Ok(Fan {
                    index: fan,
                    label: fan.label(),
                    speed: self.get_speed(fan)?,
                    speed_rpm: self.get_tachometer(fan)?,
                    minimum: self.fan_minimum,
                    mode: self.control.mode(fan)?,
                })
            })
            .collect()
    }
}
