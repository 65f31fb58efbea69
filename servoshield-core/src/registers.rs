//! PCA9685 register layout
//!
//! Addresses and bit masks as the shield uses them. The chip has more
//! registers than this; the driver never touches the rest.

/// Register addresses
pub mod reg {
    /// Mode register 1 (sleep, auto-increment, all-call)
    pub const MODE1: u8 = 0x00;
    /// PWM frequency prescaler; writable only while MODE1.SLEEP is set
    pub const PRE_SCALE: u8 = 0xFE;
    /// First per-channel register block
    pub const CHANNEL_BLOCK_BASE: u8 = 0x08;
    /// Size of one channel block in bytes
    pub const CHANNEL_BLOCK_STRIDE: u8 = 4;
}

/// Byte offsets inside a channel block
pub mod block {
    /// On edge, low byte
    pub const ON_L: u8 = 0;
    /// On edge, high nibble
    pub const ON_H: u8 = 1;
    /// Off edge, low byte
    pub const OFF_L: u8 = 2;
    /// Off edge, high nibble
    pub const OFF_H: u8 = 3;
}

/// MODE1 bit masks
pub mod mode1 {
    /// Register auto-increment
    pub const AI: u8 = 1 << 5;
    /// Low power mode, oscillator off
    pub const SLEEP: u8 = 1 << 4;
    /// Respond to the LED all-call address
    pub const ALLCALL: u8 = 1 << 0;
}

/// MODE1 value written first: oscillator stopped so PRE_SCALE accepts writes
pub const MODE1_SLEEP_CONFIG: u8 = mode1::SLEEP | mode1::ALLCALL;

/// MODE1 value written last: oscillator running, auto-increment on
pub const MODE1_RUN_CONFIG: u8 = mode1::AI | mode1::ALLCALL;

/// Nominal internal oscillator frequency
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Counter resolution per PWM period
pub const TICKS_PER_PERIOD: u32 = 4096;

/// Servo frame rate (20 ms period)
pub const PWM_FREQUENCY_HZ: u32 = 50;

/// Time the oscillator needs after leaving sleep
pub const OSCILLATOR_STARTUP_MS: u32 = 100;

/// Compute the PRE_SCALE value for an output frequency
///
/// `round(osc / (4096 * freq)) - 1`, in integer arithmetic.
pub const fn prescale_for(freq_hz: u32) -> u8 {
    let divisor = TICKS_PER_PERIOD * freq_hz;
    let rounded = (OSCILLATOR_HZ + divisor / 2) / divisor;
    (rounded - 1) as u8
}

/// Prescaler for the 50 Hz servo frame
pub const PRESCALE_50HZ: u8 = prescale_for(PWM_FREQUENCY_HZ);
