//! Dual-PCA9685 servo shield controller
//!
//! Sixteen servos hang off each PCA9685; both chips share one I2C bus and,
//! optionally, two output-enable (OE) lines wired to MCU pins. The OE lines
//! are active low: driving them high mutes every output of the chip
//! without touching its registers.
//!
//! # Initialization
//!
//! The order of the register writes matters. PRE_SCALE only takes effect
//! while the oscillator sleeps; written at any other time the chip accepts
//! the byte and keeps its old frequency. `initialize()` therefore:
//!
//! 1. mutes the OE lines (if gating is used)
//! 2. MODE1 := SLEEP | ALLCALL on chip A, then chip B
//! 3. PRE_SCALE := 121 (50 Hz) on chip A, then chip B
//! 4. MODE1 := AI | ALLCALL on chip A, then chip B
//! 5. waits 100 ms for the oscillators
//!
//! # Pulse writes
//!
//! Every channel turns on at tick 0; only the off edge moves. A pulse write
//! is a single auto-incremented transaction `[OFF_L, low, high]`.
//!
//! ```ignore
//! let mut shield = ServoShield::new(i2c, delay, ShieldConfig::default(), pins);
//! shield.initialize()?;
//! shield.enable_pwm_outputs().ok(); // Err only without gating pins
//! shield.set_servo_pulse_duration(ChannelId::Servo1, 1500)?;
//! ```

pub mod log;

use servoshield_core::registers::{block, reg, MODE1_RUN_CONFIG, MODE1_SLEEP_CONFIG};
use servoshield_core::registers::{OSCILLATOR_STARTUP_MS, PRESCALE_50HZ};
use servoshield_core::{
    lookup, microseconds_to_ticks, BusAddresses, ChannelId, ChipSelect, ChipState, InitStep,
    ShieldConfig, TimerTicks,
};
use servoshield_hal::gpio::NoPin;
use servoshield_hal::{DelayMs, I2cBus, OutputPin};

use self::log::{NoopLogger, ShieldEvent, ShieldLogger};

/// Gating requested on a shield built without output-enable pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GatingUnavailable;

/// The two output-enable lines (OE of chip A, OE of chip B)
#[derive(Debug)]
pub struct GatingPins<P> {
    /// OE line of chip A (SC1)
    pub sc1: P,
    /// OE line of chip B (SC2)
    pub sc2: P,
}

impl<P: OutputPin> GatingPins<P> {
    /// Bundle two pins
    pub fn new(sc1: P, sc2: P) -> Self {
        Self { sc1, sc2 }
    }

    /// Drive both lines; `enabled` means outputs active (lines low)
    fn drive(&mut self, enabled: bool) {
        self.sc1.set_state(!enabled);
        self.sc2.set_state(!enabled);
    }
}

/// Raw contents of one channel's register block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelRegisters {
    pub on_l: u8,
    pub on_h: u8,
    pub off_l: u8,
    pub off_h: u8,
}

impl ChannelRegisters {
    /// Tick at which the output turns on
    pub fn on_ticks(&self) -> TimerTicks {
        TimerTicks::from_bytes(self.on_l, self.on_h)
    }

    /// Tick at which the output turns off
    pub fn off_ticks(&self) -> TimerTicks {
        TimerTicks::from_bytes(self.off_l, self.off_h)
    }
}

/// Servo shield controller
///
/// Owns the bus, the delay provider and the OE pins for its lifetime.
/// Every operation takes `&mut self`, so bus transactions issued by one
/// controller can never interleave.
pub struct ServoShield<I2C, P, D, L = NoopLogger> {
    i2c: I2C,
    delay: D,
    pins: GatingPins<P>,
    use_gating_pins: bool,
    addresses: BusAddresses,
    states: [ChipState; 2],
    outputs_enabled: Option<bool>,
    logger: L,
}

impl<I2C, P, D> ServoShield<I2C, P, D, NoopLogger>
where
    I2C: I2cBus,
    P: OutputPin,
    D: DelayMs,
{
    /// Create a controller; performs no I/O
    ///
    /// The pins are only driven when `config.use_gating_pins` is set.
    pub fn new(i2c: I2C, delay: D, config: ShieldConfig, pins: GatingPins<P>) -> Self {
        Self {
            i2c,
            delay,
            pins,
            use_gating_pins: config.use_gating_pins,
            addresses: config.addresses,
            states: [ChipState::Uninitialized; 2],
            outputs_enabled: None,
            logger: NoopLogger,
        }
    }
}

impl<I2C, D> ServoShield<I2C, NoPin, D, NoopLogger>
where
    I2C: I2cBus,
    D: DelayMs,
{
    /// Create a controller for a shield whose OE jumpers are open
    pub fn without_gating(i2c: I2C, delay: D, addresses: BusAddresses) -> Self {
        Self::new(
            i2c,
            delay,
            ShieldConfig::new(addresses, false),
            GatingPins::new(NoPin, NoPin),
        )
    }
}

impl<I2C, P, D, L> ServoShield<I2C, P, D, L>
where
    I2C: I2cBus,
    P: OutputPin,
    D: DelayMs,
    L: ShieldLogger,
{
    /// Replace the event logger
    pub fn with_logger<L2: ShieldLogger>(self, logger: L2) -> ServoShield<I2C, P, D, L2> {
        ServoShield {
            i2c: self.i2c,
            delay: self.delay,
            pins: self.pins,
            use_gating_pins: self.use_gating_pins,
            addresses: self.addresses,
            states: self.states,
            outputs_enabled: self.outputs_enabled,
            logger,
        }
    }

    /// Configure both chips for 50 Hz servo output
    ///
    /// Safe to call again; the sequence is repeated from the top and the
    /// OE lines are muted until [`enable_pwm_outputs`](Self::enable_pwm_outputs)
    /// is called. A bus error aborts the sequence and leaves
    /// [`state`](Self::state) at the last completed step. Readback
    /// failures are logged and do not fail the call.
    pub fn initialize(&mut self) -> Result<(), I2C::Error> {
        if self.use_gating_pins {
            self.pins.sc1.configure_as_output();
            self.pins.sc2.configure_as_output();
            self.set_gating(false);
        }

        for chip in ChipSelect::ALL {
            self.write_register(chip, reg::MODE1, MODE1_SLEEP_CONFIG)?;
            self.advance(chip, InitStep::ModeSleep);
        }

        for chip in ChipSelect::ALL {
            debug_assert!(self.states[chip.index()].prescale_allowed());
            self.write_register(chip, reg::PRE_SCALE, PRESCALE_50HZ)?;
            self.advance(chip, InitStep::Prescale);
        }

        for chip in ChipSelect::ALL {
            self.write_register(chip, reg::MODE1, MODE1_RUN_CONFIG)?;
            self.advance(chip, InitStep::ModeWake);
        }

        self.delay.delay_ms(OSCILLATOR_STARTUP_MS);

        self.logger.log(&ShieldEvent::Initialized {
            addresses: self.addresses,
        });

        if self.logger.readback_enabled() {
            for chip in ChipSelect::ALL {
                for register in [reg::MODE1, reg::PRE_SCALE] {
                    self.read_back(chip, register);
                }
            }
        }

        Ok(())
    }

    /// Drive both OE lines low, un-muting every output
    pub fn enable_pwm_outputs(&mut self) -> Result<(), GatingUnavailable> {
        if !self.use_gating_pins {
            return Err(GatingUnavailable);
        }
        self.set_gating(true);
        Ok(())
    }

    /// Drive both OE lines high, muting every output
    pub fn disable_pwm_outputs(&mut self) -> Result<(), GatingUnavailable> {
        if !self.use_gating_pins {
            return Err(GatingUnavailable);
        }
        self.set_gating(false);
        Ok(())
    }

    /// Set the pulse width of one servo output
    ///
    /// Widths are not range-checked. Anything past the 20 ms frame
    /// saturates at 4095 ticks; keeping within the servo's 1000-2000 µs
    /// range is up to the caller.
    pub fn set_servo_pulse_duration(
        &mut self,
        channel: ChannelId,
        pulse_us: u32,
    ) -> Result<(), I2C::Error> {
        let entry = lookup(channel);
        let ticks = microseconds_to_ticks(pulse_us);

        if !self.states[entry.chip.index()].is_running() {
            self.logger.log(&ShieldEvent::WriteBeforeInit { channel });
        }

        // Auto-increment carries the high byte into OFF_H
        let frame = [entry.off_l(), ticks.low_byte(), ticks.high_byte()];
        self.i2c
            .write(self.addresses.address(entry.chip), &frame)?;

        self.logger.log(&ShieldEvent::PulseWritten {
            channel,
            pulse_us,
            ticks,
        });

        if self.logger.readback_enabled() {
            for offset in [block::ON_L, block::ON_H, block::OFF_L, block::OFF_H] {
                self.read_back(entry.chip, entry.base + offset);
            }
        }

        Ok(())
    }

    /// Read a single register
    pub fn read_register(
        &mut self,
        chip: ChipSelect,
        register: u8,
    ) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addresses.address(chip), &[register], &mut buf)?;
        Ok(buf[0])
    }

    /// Read the four registers of a channel block
    ///
    /// Registers are read one at a time so this works before
    /// auto-increment is enabled.
    pub fn channel_snapshot(
        &mut self,
        channel: ChannelId,
    ) -> Result<ChannelRegisters, I2C::Error> {
        let entry = lookup(channel);
        Ok(ChannelRegisters {
            on_l: self.read_register(entry.chip, entry.base + block::ON_L)?,
            on_h: self.read_register(entry.chip, entry.base + block::ON_H)?,
            off_l: self.read_register(entry.chip, entry.base + block::OFF_L)?,
            off_h: self.read_register(entry.chip, entry.base + block::OFF_H)?,
        })
    }

    /// Initialization state of one chip
    pub fn state(&self, chip: ChipSelect) -> ChipState {
        self.states[chip.index()]
    }

    /// Configured bus addresses
    pub fn addresses(&self) -> BusAddresses {
        self.addresses
    }

    /// Check if OE gating is in use
    pub fn gating_enabled(&self) -> bool {
        self.use_gating_pins
    }

    /// Last level driven on the OE lines
    ///
    /// `None` until the lines are first driven, and always `None` without
    /// gating.
    pub fn outputs_enabled(&self) -> Option<bool> {
        self.outputs_enabled
    }

    /// Tear down the controller and hand back its resources
    pub fn release(self) -> (I2C, D, GatingPins<P>) {
        (self.i2c, self.delay, self.pins)
    }

    fn write_register(
        &mut self,
        chip: ChipSelect,
        register: u8,
        value: u8,
    ) -> Result<(), I2C::Error> {
        self.i2c
            .write(self.addresses.address(chip), &[register, value])
    }

    fn read_back(&mut self, chip: ChipSelect, register: u8) {
        let event = match self.read_register(chip, register) {
            Ok(value) => ShieldEvent::Readback {
                chip,
                register,
                value,
            },
            Err(_) => ShieldEvent::ReadbackFailed { chip, register },
        };
        self.logger.log(&event);
    }

    fn advance(&mut self, chip: ChipSelect, step: InitStep) {
        let state = &mut self.states[chip.index()];
        *state = state.transition(step);
    }

    fn set_gating(&mut self, enabled: bool) {
        self.pins.drive(enabled);
        self.outputs_enabled = Some(enabled);
        self.logger.log(&ShieldEvent::OutputsGated { enabled });
    }
}
