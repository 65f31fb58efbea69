//! Shield configuration
//!
//! Both PCA9685s share the five address jumpers on the shield: chip A
//! answers at `0x40 | jumpers`, chip B at `0x60 | jumpers`. The two
//! extremes are provided as presets, but any address pair is accepted as
//! given so boards with reworked jumpers keep working.

use crate::channel::ChipSelect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chip A address with no jumpers set
pub const CHIP_A_BASE_ADDRESS: u8 = 0x40;

/// Chip B address with no jumpers set
pub const CHIP_B_BASE_ADDRESS: u8 = 0x60;

/// Mask of the shared address jumpers
pub const JUMPER_MASK: u8 = 0x1F;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address does not fit in 7 bits
    AddressOutOfRange(u8),
    /// Both chips configured at the same address
    DuplicateAddress(u8),
    /// Jumper value uses bits outside the five address jumpers
    InvalidJumpers(u8),
}

/// I2C addresses of the two PWM controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusAddresses {
    /// 7-bit address of chip A (servos 1-16)
    pub chip_a: u8,
    /// 7-bit address of chip B (servos 17-32)
    pub chip_b: u8,
}

impl BusAddresses {
    /// Factory state, no address jumpers closed
    pub const NO_JUMPERS_SET: Self = Self::new(0x40, 0x60);

    /// Every address jumper closed
    pub const ALL_JUMPERS_SET: Self = Self::new(0x5F, 0x7F);

    /// Use the given addresses verbatim
    pub const fn new(chip_a: u8, chip_b: u8) -> Self {
        Self { chip_a, chip_b }
    }

    /// Derive both addresses from the shared jumper bits (0-31)
    pub const fn from_jumpers(jumpers: u8) -> Result<Self, ConfigError> {
        if jumpers & !JUMPER_MASK != 0 {
            return Err(ConfigError::InvalidJumpers(jumpers));
        }
        Ok(Self::new(
            CHIP_A_BASE_ADDRESS | jumpers,
            CHIP_B_BASE_ADDRESS | jumpers,
        ))
    }

    /// Address of one chip
    pub const fn address(&self, chip: ChipSelect) -> u8 {
        match chip {
            ChipSelect::A => self.chip_a,
            ChipSelect::B => self.chip_b,
        }
    }

    /// Check that both addresses are usable 7-bit addresses and distinct
    pub fn validate(&self) -> Result<(), ConfigError> {
        for address in [self.chip_a, self.chip_b] {
            if address > 0x7F {
                return Err(ConfigError::AddressOutOfRange(address));
            }
        }
        if self.chip_a == self.chip_b {
            return Err(ConfigError::DuplicateAddress(self.chip_a));
        }
        Ok(())
    }
}

impl Default for BusAddresses {
    fn default() -> Self {
        Self::NO_JUMPERS_SET
    }
}

/// Construction parameters for the shield controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShieldConfig {
    /// Bus addresses of both chips
    pub addresses: BusAddresses,
    /// Output-enable gating pins are wired (SC1_OE / SC2_OE jumpers closed)
    pub use_gating_pins: bool,
}

impl ShieldConfig {
    /// Create a configuration
    pub const fn new(addresses: BusAddresses, use_gating_pins: bool) -> Self {
        Self {
            addresses,
            use_gating_pins,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.addresses.validate()
    }
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self::new(BusAddresses::NO_JUMPERS_SET, true)
    }
}
