//! Per-device configuration.

use drp_driver_api::IrqLine;

use super::error::ControllerError;

/// I²C address the device answers on unless strapped otherwise.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x1D;

/// Shortest wait after a port mode write.
pub const SETTLE_DELAY_MIN_US: u32 = 10;
/// Longest wait after a port mode write.
pub const SETTLE_DELAY_MAX_US: u32 = 100;
/// Wait after a port mode write when none is configured.
pub const DEFAULT_SETTLE_DELAY_US: u32 = 20;

/// Configuration for one PI5USB30213A instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit I²C address.
    pub address: u8,
    /// Interrupt line, if INT_N is wired.
    pub irq: Option<IrqLine>,
    /// Time the device needs after a port mode write before the next access.
    pub settle_delay_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDRESS,
            irq: None,
            settle_delay_us: DEFAULT_SETTLE_DELAY_US,
        }
    }
}

impl Config {
    /// Checks that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] naming the bad field.
    pub const fn validate(&self) -> Result<(), ControllerError> {
        if self.address > 0x7F {
            return Err(ControllerError::InvalidConfig("i2c address"));
        }
        if self.settle_delay_us < SETTLE_DELAY_MIN_US || self.settle_delay_us > SETTLE_DELAY_MAX_US
        {
            return Err(ControllerError::InvalidConfig("settle delay"));
        }
        Ok(())
    }
}
