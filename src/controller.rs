//! Fan mode state machine on top of the firmware gateway.
//!
//! While a fan is pinned manually the firmware stops reporting its speed, so
//! reads are answered from the state store instead. Returning to automatic
//! is a single global firmware call and therefore always updates both fans.

use log::{debug, info, warn};

use crate::errors::{FanControlError, Result};
use crate::fan::{FanIndex, FanMode, SetTarget};
use crate::firmware::FirmwareGateway;
use crate::platform::PlatformProfile;
use crate::quirks::normalize_read;
use crate::state::{FanStateStore, DEFAULT_CEILING};

pub struct FanControl {
    profile: PlatformProfile,
    gateway: FirmwareGateway,
    store: FanStateStore,
}

impl FanControl {
    pub fn new(profile: PlatformProfile, gateway: FirmwareGateway) -> Self {
        Self {
            profile,
            gateway,
            store: FanStateStore::new(),
        }
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn gateway(&self) -> &FirmwareGateway {
        &self.gateway
    }

    pub fn mode(&self, fan: FanIndex) -> Result<FanMode> {
        self.check_fan(fan)?;
        Ok(self.store.get_mode(fan))
    }

    /// Reject fans the platform does not have, before touching firmware.
    pub fn check_fan(&self, fan: FanIndex) -> Result<()> {
        if fan == FanIndex::Secondary && !self.profile.has_secondary_fan {
            return Err(FanControlError::UnsupportedFan(fan));
        }
        Ok(())
    }

    /// Current speed: the pinned value in manual mode, otherwise a
    /// quirk-normalized firmware reading.
    pub fn get_state(&self, fan: FanIndex) -> Result<u32> {
        self.check_fan(fan)?;
        let mode = self.store.lock_fan(fan);
        match *mode {
            FanMode::Manual(speed) => Ok(u32::from(speed)),
            FanMode::Automatic => {
                let raw = self.gateway.read_speed(fan)?;
                Ok(normalize_read(raw, self.profile.quirk))
            }
        }
    }

    pub fn set_state(&self, fan: FanIndex, target: SetTarget) -> Result<()> {
        self.check_fan(fan)?;
        match target {
            SetTarget::Automatic => self.set_auto(),
            SetTarget::Manual(speed) => {
                let mut mode = self.store.lock_fan(fan);
                // Recorded before the call: a failed write still reflects intent.
                *mode = FanMode::Manual(speed);
                debug!("{} -> manual {}", fan, speed);
                self.gateway.write_speed(fan, speed)
            }
        }
    }

    /// Hand every fan back to firmware control.
    ///
    /// The firmware call is not selective, so both cached slots are cleared
    /// on success even on single-fan platforms. On failure the cache keeps
    /// its previous modes, which is what the hardware is still doing.
    pub fn set_auto(&self) -> Result<()> {
        let mut all = self.store.lock_all();
        if let Err(error) = self.gateway.set_auto_all() {
            warn!(
                "resetting fans to automatic mode failed: {} - fans may stay pinned, watch temperatures",
                error
            );
            return Err(error);
        }
        all.set_all(FanMode::Automatic);
        debug!("all fans -> automatic");
        Ok(())
    }

    /// Set the speed ceiling, or restore the factory one when `reset` is
    /// set (in which case `value` is ignored).
    pub fn set_max_speed(&self, value: u8, reset: bool) -> Result<()> {
        let mut ceiling = self.store.lock_ceiling();
        let applied = if reset {
            self.gateway.reset_max_ceiling()?;
            DEFAULT_CEILING
        } else {
            self.gateway.set_max_ceiling(value)?;
            value
        };
        *ceiling = applied;
        debug!("speed ceiling -> {}", applied);
        Ok(())
    }

    /// Last ceiling sent to firmware. The firmware cannot report it.
    pub fn get_max_speed(&self) -> u8 {
        self.store.get_ceiling()
    }

    /// Put everything into the safe hand-off state: default ceiling and
    /// every fan under firmware control.
    ///
    /// The automatic-mode call is issued even when restoring the ceiling
    /// fails; the first error is returned afterwards. Cached modes only
    /// change once firmware accepted the automatic-mode call.
    pub fn reset(&self) -> Result<()> {
        let ceiling = self.set_max_speed(DEFAULT_CEILING, false);
        if let Err(error) = &ceiling {
            warn!("restoring default speed ceiling failed: {}", error);
        }
        let auto = self.set_auto();
        ceiling.and(auto)?;
        info!("fans reset to automatic mode, ceiling {}", DEFAULT_CEILING);
        Ok(())
    }
}
