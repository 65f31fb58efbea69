//! `embedded-hal` 1.0 adapters
//!
//! Most HALs (embassy-rp, esp-hal, linux-embedded-hal, ...) implement the
//! `embedded-hal` traits rather than `servoshield-hal`. These newtypes
//! bridge the two so any of them can drive the shield.
//!
//! ```ignore
//! let i2c = EhI2c(embassy_rp::i2c::I2c::new_blocking(p.I2C0, scl, sda, cfg));
//! let delay = EhDelay(embassy_time::Delay);
//! ```

use core::convert::Infallible;

use servoshield_hal::{DelayMs, I2cBus, OutputPin};

/// I2C bus from an `embedded_hal::i2c::I2c`
#[derive(Debug)]
pub struct EhI2c<T>(pub T);

impl<T: embedded_hal::i2c::I2c> I2cBus for EhI2c<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}

/// Output pin from an infallible `embedded_hal::digital::OutputPin`
///
/// Only pins that cannot fail are accepted; OE writes have no error path.
#[derive(Debug)]
pub struct EhOutputPin<T>(pub T);

impl<T> OutputPin for EhOutputPin<T>
where
    T: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        self.0.set_high().unwrap_or_else(|never| match never {});
    }

    fn set_low(&mut self) {
        self.0.set_low().unwrap_or_else(|never| match never {});
    }
}

/// Delay from an `embedded_hal::delay::DelayNs`
#[derive(Debug)]
pub struct EhDelay<T>(pub T);

impl<T: embedded_hal::delay::DelayNs> DelayMs for EhDelay<T> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use heapless::Vec;

    struct FakeI2c {
        log: Vec<(u8, Vec<u8, 4>), 8>,
        reply: u8,
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl embedded_hal::i2c::I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.log
                            .push((address, Vec::from_slice(bytes).unwrap()))
                            .unwrap();
                    }
                    Operation::Read(buf) => buf.fill(self.reply),
                }
            }
            Ok(())
        }
    }

    struct FakePin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl embedded_hal::digital::OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    struct FakeDelay {
        ns: u64,
    }

    impl embedded_hal::delay::DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ns += ns as u64;
        }
    }

    #[test]
    fn test_i2c_adapter() {
        let mut bus = EhI2c(FakeI2c {
            log: Vec::new(),
            reply: 0x79,
        });

        bus.write(0x40, &[0xFE, 121]).unwrap();
        let mut buf = [0u8; 1];
        bus.write_read(0x60, &[0xFE], &mut buf).unwrap();

        assert_eq!(buf[0], 0x79);
        assert_eq!(bus.0.log.len(), 2);
        assert_eq!(bus.0.log[0].0, 0x40);
        assert_eq!(bus.0.log[0].1.as_slice(), &[0xFE, 121]);
        assert_eq!(bus.0.log[1].0, 0x60);
    }

    #[test]
    fn test_pin_adapter() {
        let mut pin = EhOutputPin(FakePin { high: false });
        pin.set_state(true);
        assert!(pin.0.high);
        pin.set_low();
        assert!(!pin.0.high);
    }

    #[test]
    fn test_delay_adapter() {
        let mut delay = EhDelay(FakeDelay { ns: 0 });
        delay.delay_ms(100);
        assert!(delay.0.ns >= 100_000_000);
    }
}
