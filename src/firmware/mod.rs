//! Named ACPI methods used to drive the fans, and the gateway that issues them.

mod acpi_call;
#[cfg(test)]
pub(crate) mod fake;

use std::sync::{Mutex, PoisonError};

use log::{debug, trace, warn};

use crate::errors::Result;
use crate::fan::FanIndex;

pub use acpi_call::{AcpiCallTransport, ACPI_CALL_PATH};

/// Reads the current speed of a fan (argument: fan index).
pub const METHOD_READ_SPEED: &str = "\\_TZ.RFAN";
/// Pins a fan (argument: fan index + 1, speed). Index 0 means "all fans auto".
pub const METHOD_WRITE_SPEED: &str = "\\_SB.PCI0.LPCB.EC0.SFNV";
/// Sets the speed ceiling applied to every fan (argument: 0–255).
pub const METHOD_SET_CEILING: &str = "\\_SB.PCI0.LPCB.EC0.ST98";
/// Quiet-mode selector; argument 2 restores the factory ceiling (0xFF).
pub const METHOD_QUIET_MODE: &str = "\\_SB.ATKD.QMOD";
/// Reads the tachometer of a fan (argument: fan index).
pub const METHOD_TACHOMETER: &str = "\\_SB.PCI0.LPCB.EC0.TACH";

const QMOD_RESTORE_DEFAULT: u64 = 2;
const SFNV_ALL_FANS: u64 = 0;

/// Something that can evaluate a named firmware method with integer arguments.
///
/// Implementations are not assumed to tolerate concurrent use; the
/// [`FirmwareGateway`] holds a lock around every call.
pub trait FirmwareTransport: Send {
    fn evaluate(&mut self, method: &str, args: &[u64]) -> Result<u64>;
}

/// Issues the fan-related firmware calls, one at a time.
pub struct FirmwareGateway {
    transport: Mutex<Box<dyn FirmwareTransport>>,
}

impl FirmwareGateway {
    pub fn new(transport: Box<dyn FirmwareTransport>) -> Self {
        Self {
            transport: Mutex::new(transport),
        }
    }

    fn call(&self, method: &str, args: &[u64]) -> Result<u64> {
        let mut transport = self.transport.lock().unwrap_or_else(PoisonError::into_inner);
        trace!("evaluating {} {:?}", method, args);
        let result = transport.evaluate(method, args);
        match &result {
            Ok(value) => trace!("{} returned {:#x}", method, value),
            Err(error) => debug!("{} failed: {}", method, error),
        }
        result
    }

    /// Raw speed reading. Units depend on the platform, see [`crate::quirks`].
    pub fn read_speed(&self, fan: FanIndex) -> Result<u64> {
        self.call(METHOD_READ_SPEED, &[fan.as_index() as u64])
    }

    /// Switch `fan` to manual operation at `value`.
    pub fn write_speed(&self, fan: FanIndex, value: u8) -> Result<()> {
        let firmware_fan = fan.as_index() as u64 + 1;
        self.call(METHOD_WRITE_SPEED, &[firmware_fan, u64::from(value)])?;
        Ok(())
    }

    /// Return every fan to automatic control. There is no per-fan variant.
    pub fn set_auto_all(&self) -> Result<()> {
        self.call(METHOD_WRITE_SPEED, &[SFNV_ALL_FANS, 0])?;
        Ok(())
    }

    pub fn set_max_ceiling(&self, value: u8) -> Result<()> {
        self.call(METHOD_SET_CEILING, &[u64::from(value)])?;
        Ok(())
    }

    pub fn reset_max_ceiling(&self) -> Result<()> {
        self.call(METHOD_QUIET_MODE, &[QMOD_RESTORE_DEFAULT])?;
        Ok(())
    }

    /// Best-effort tachometer reading; any failure reads as 0.
    pub fn read_tachometer(&self, fan: FanIndex) -> u32 {
        match self.call(METHOD_TACHOMETER, &[fan.as_index() as u64]) {
            Ok(value) => u32::try_from(value).unwrap_or(u32::MAX),
            Err(error) => {
                warn!("tachometer read for {} failed: {}", fan, error);
                0
            }
        }
    }
}
