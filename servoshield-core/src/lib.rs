//! Board-agnostic core logic for the 32-channel servo shield
//!
//! The shield carries two PCA9685 PWM controllers on one I2C bus, sixteen
//! servo outputs each. This crate holds everything that does not touch the
//! bus:
//!
//! - Channel identifiers and the static channel → register map
//! - PCA9685 register addresses and MODE1 bits
//! - Microsecond → timer tick conversion
//! - Per-chip initialization state machine
//! - Configuration types (bus addresses, gating)

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod registers;
pub mod state;
pub mod timing;

pub use channel::{lookup, ChannelId, ChipSelect, InvalidChannel, RegisterEntry, REGISTER_MAP};
pub use config::{BusAddresses, ConfigError, ShieldConfig};
pub use state::{ChipState, InitStep};
pub use timing::{microseconds_to_ticks, TimerTicks};
