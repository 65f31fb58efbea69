//! I2C bus abstractions
//!
//! The shield only needs addressed, ordered, byte-sequential writes plus a
//! write-then-read for diagnostics. Bus speed and retry policy belong to
//! the implementation.

/// I2C bus master
///
/// One call is one bus transaction: start, address, bytes, stop. The
/// driver relies on the bytes of a single `write` never being interleaved
/// with another transaction.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write, register address first
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// Used to select a register and read its contents back.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz), the PCA9685's upper limit without Fm+
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };

    /// Pick the preset for a frequency in kHz
    ///
    /// Anything other than 400 or 1000 falls back to standard mode.
    pub const fn from_khz(khz: u32) -> Self {
        match khz {
            400 => Self::FAST,
            1000 => Self::FAST_PLUS,
            _ => Self::STANDARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_khz() {
        assert_eq!(I2cConfig::from_khz(400), I2cConfig::FAST);
        assert_eq!(I2cConfig::from_khz(1000), I2cConfig::FAST_PLUS);
        assert_eq!(I2cConfig::from_khz(100), I2cConfig::STANDARD);
        assert_eq!(I2cConfig::from_khz(250), I2cConfig::STANDARD);
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(I2cConfig::default(), I2cConfig::STANDARD);
    }
}
