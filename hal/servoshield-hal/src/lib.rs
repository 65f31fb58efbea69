//! Servoshield Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the shield driver
//! needs from the board it runs on. Chip-specific code (an embassy HAL, a
//! bit-banged bus, a test mock) implements them; the driver never touches
//! peripherals directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (servoshield-firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  servoshield-drivers (ServoShield)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  servoshield-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  host mocks   │
//! │   adapters    │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Addressed two-wire bus transactions
//! - [`gpio::OutputPin`] - Digital output (output-enable gating)
//! - [`delay::DelayMs`] - Blocking millisecond delay

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::OutputPin;
pub use i2c::{I2cBus, I2cConfig};
