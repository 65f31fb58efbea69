//! Pulse width → timer tick conversion
//!
//! At 50 Hz the PCA9685 splits the 20 000 µs frame into 4096 ticks, so one
//! tick is about 4.8828 µs. The conversion multiplies by 100/488 in integer
//! arithmetic and truncates. Boards already deployed rely on these exact
//! values, so the approximation must not be "improved".
//!
//! Requests are never rejected: anything past the end of the frame
//! saturates at [`TimerTicks::MAX`]. Keeping a servo inside its mechanical
//! range ([`SERVO_MIN_SAFE_US`]..=[`SERVO_MAX_SAFE_US`] for typical hobby
//! servos) is the caller's job.

/// Shortest pulse typical servos accept
pub const SERVO_MIN_SAFE_US: u32 = 1000;

/// Longest pulse typical servos accept
pub const SERVO_MAX_SAFE_US: u32 = 2000;

/// Centre position of a typical servo
pub const SERVO_CENTER_US: u32 = 1500;

/// Off-edge position in a 12-bit PWM frame (0-4095)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerTicks(u16);

impl TimerTicks {
    /// Last tick of the frame
    pub const MAX: TimerTicks = TimerTicks(4095);

    /// Create from a raw count, saturating at [`TimerTicks::MAX`]
    pub const fn new(raw: u16) -> Self {
        if raw > Self::MAX.0 {
            Self::MAX
        } else {
            Self(raw)
        }
    }

    /// Raw tick count
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Byte for the OFF_L register
    pub const fn low_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Byte for the OFF_H register (only the low nibble is meaningful)
    pub const fn high_byte(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Rebuild from the OFF_L / OFF_H register pair
    pub const fn from_bytes(low: u8, high: u8) -> Self {
        Self::new(((high as u16 & 0x0F) << 8) | low as u16)
    }

    /// Approximate pulse width in µs, the inverse of the conversion
    ///
    /// Used for diagnostics only; `to_micros(microseconds_to_ticks(x))` is
    /// at most a few microseconds below `x`.
    pub const fn to_micros(self) -> u32 {
        self.0 as u32 * 488 / 100
    }
}

/// Convert a pulse width in microseconds to timer ticks
///
/// `min(pulse_us * 100 / 488, 4095)`, truncating. 0 µs gives 0 ticks.
pub const fn microseconds_to_ticks(pulse_us: u32) -> TimerTicks {
    let raw = pulse_us.saturating_mul(100) / 488;
    if raw > TimerTicks::MAX.0 as u32 {
        TimerTicks::MAX
    } else {
        TimerTicks(raw as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(microseconds_to_ticks(0).get(), 0);
        assert_eq!(microseconds_to_ticks(1000).get(), 204);
        assert_eq!(microseconds_to_ticks(1500).get(), 307);
        assert_eq!(microseconds_to_ticks(2000).get(), 409);
    }

    #[test]
    fn test_saturates_at_frame_end() {
        // 20000 * 100 / 488 = 4098, past the last tick
        assert_eq!(microseconds_to_ticks(20_000), TimerTicks::MAX);
        assert_eq!(microseconds_to_ticks(25_000), TimerTicks::MAX);
        assert_eq!(microseconds_to_ticks(u32::MAX), TimerTicks::MAX);
    }

    #[test]
    fn test_last_unsaturated_value() {
        // 19988 * 100 / 488 = 4095.9
        assert_eq!(microseconds_to_ticks(19_988).get(), 4095);
        assert_eq!(microseconds_to_ticks(19_983).get(), 4094);
    }

    #[test]
    fn test_register_bytes() {
        let ticks = microseconds_to_ticks(1500);
        assert_eq!(ticks.low_byte(), 0x33);
        assert_eq!(ticks.high_byte(), 0x01);

        assert_eq!(TimerTicks::MAX.low_byte(), 0xFF);
        assert_eq!(TimerTicks::MAX.high_byte(), 0x0F);
    }

    #[test]
    fn test_from_bytes_masks_high_nibble() {
        assert_eq!(TimerTicks::from_bytes(0x33, 0x01).get(), 307);
        // Bit 4 of OFF_H is the full-off flag, not part of the count
        assert_eq!(TimerTicks::from_bytes(0x00, 0x10).get(), 0);
    }

    #[test]
    fn test_to_micros_is_close() {
        let ticks = microseconds_to_ticks(1500);
        assert_eq!(ticks.to_micros(), 1498);
    }

    proptest! {
        #[test]
        fn prop_matches_formula(pulse_us in 0u32..20_000) {
            let expected = (pulse_us * 100 / 488).min(4095) as u16;
            prop_assert_eq!(microseconds_to_ticks(pulse_us).get(), expected);
        }

        #[test]
        fn prop_never_exceeds_max(pulse_us in any::<u32>()) {
            prop_assert!(microseconds_to_ticks(pulse_us) <= TimerTicks::MAX);
        }

        #[test]
        fn prop_monotonic(a in any::<u32>(), b in any::<u32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(microseconds_to_ticks(lo) <= microseconds_to_ticks(hi));
        }

        #[test]
        fn prop_high_byte_fits_nibble(pulse_us in any::<u32>()) {
            prop_assert!(microseconds_to_ticks(pulse_us).high_byte() <= 0x0F);
        }
    }
}
