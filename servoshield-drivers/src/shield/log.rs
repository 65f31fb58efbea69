//! Observability hook for the shield driver
//!
//! The driver never formats or prints anything itself. It reports
//! [`ShieldEvent`]s to a [`ShieldLogger`] supplied at construction. A
//! logger can also ask for register readback, in which case the driver
//! reads MODE1/PRE_SCALE after initialization and the four channel
//! registers after every pulse write, and reports the values it got.
//! Readback never changes the outcome of the operation that triggered it.

use servoshield_core::{BusAddresses, ChannelId, ChipSelect, TimerTicks};

/// Something the driver did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShieldEvent {
    /// Both chips configured and awake
    Initialized {
        /// Addresses that were configured
        addresses: BusAddresses,
    },
    /// Output-enable pins driven
    OutputsGated {
        /// True when outputs were enabled (pins low)
        enabled: bool,
    },
    /// Off-edge registers written for a channel
    PulseWritten {
        /// Target channel
        channel: ChannelId,
        /// Requested width
        pulse_us: u32,
        /// Value written to the chip
        ticks: TimerTicks,
    },
    /// Pulse written to a chip that has not finished initialization
    WriteBeforeInit {
        /// Target channel
        channel: ChannelId,
    },
    /// Register value read back from a chip
    Readback {
        /// Chip that was read
        chip: ChipSelect,
        /// Register address
        register: u8,
        /// Value returned
        value: u8,
    },
    /// Diagnostic read failed; the preceding write is unaffected
    ReadbackFailed {
        /// Chip that was read
        chip: ChipSelect,
        /// Register address
        register: u8,
    },
}

/// Event sink injected into the driver
pub trait ShieldLogger {
    /// Record one event
    fn log(&mut self, event: &ShieldEvent);

    /// Whether the driver should read registers back for diagnostics
    ///
    /// Readback costs extra bus transactions on every write.
    fn readback_enabled(&self) -> bool {
        false
    }
}

impl<T: ShieldLogger + ?Sized> ShieldLogger for &mut T {
    fn log(&mut self, event: &ShieldEvent) {
        T::log(self, event)
    }

    fn readback_enabled(&self) -> bool {
        T::readback_enabled(self)
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ShieldLogger for NoopLogger {
    fn log(&mut self, _event: &ShieldEvent) {}
}

/// Logger that forwards events to defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtLogger {
    readback: bool,
}

#[cfg(feature = "defmt")]
impl DefmtLogger {
    /// Log events only
    pub const fn new() -> Self {
        Self { readback: false }
    }

    /// Log events and read registers back after every write
    pub const fn with_readback() -> Self {
        Self { readback: true }
    }
}

#[cfg(feature = "defmt")]
impl ShieldLogger for DefmtLogger {
    fn log(&mut self, event: &ShieldEvent) {
        match *event {
            ShieldEvent::Initialized { addresses } => {
                defmt::info!(
                    "Servo shield initialized (chip A {=u8:#x}, chip B {=u8:#x})",
                    addresses.chip_a,
                    addresses.chip_b
                );
            }
            ShieldEvent::OutputsGated { enabled } => {
                defmt::info!("PWM outputs {}", if enabled { "enabled" } else { "disabled" });
            }
            ShieldEvent::PulseWritten {
                channel,
                pulse_us,
                ticks,
            } => {
                defmt::trace!("{}: {}us -> {} ticks", channel, pulse_us, ticks.get());
            }
            ShieldEvent::WriteBeforeInit { channel } => {
                defmt::warn!("{} written before initialize(), chip is asleep", channel);
            }
            ShieldEvent::Readback {
                chip,
                register,
                value,
            } => {
                defmt::debug!("chip {} reg {=u8:#x} = {=u8:#x}", chip, register, value);
            }
            ShieldEvent::ReadbackFailed { chip, register } => {
                defmt::warn!("chip {} reg {=u8:#x} readback failed", chip, register);
            }
        }
    }

    fn readback_enabled(&self) -> bool {
        self.readback
    }
}
