//! Shield driver
//!
//! This crate drives the 32-channel servo shield through the traits in
//! `servoshield-hal`:
//!
//! - [`shield::ServoShield`]: init sequence, output-enable gating, pulse writes
//! - [`shield::log`]: injectable event logger and register readback
//! - [`adapters`]: bridges from `embedded-hal` 1.0 implementations

#![no_std]
#![deny(unsafe_code)]

pub mod adapters;
pub mod shield;

pub use shield::log::{NoopLogger, ShieldEvent, ShieldLogger};
pub use shield::{ChannelRegisters, GatingPins, GatingUnavailable, ServoShield};
