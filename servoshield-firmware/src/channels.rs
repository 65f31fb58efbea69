//! Inter-task communication channels
//!
//! Every bus access goes through the shield task; other tasks queue
//! commands here instead of sharing the controller.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use servoshield_core::ChannelId;

/// Channel capacity: one pending pulse per servo
const SERVO_CHANNEL_SIZE: usize = 32;

/// Requests handled by the shield task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoCommand {
    /// Move one servo to a pulse width
    SetPulse { channel: ChannelId, pulse_us: u32 },
    /// Drive the OE lines low
    EnableOutputs,
}

/// Commands for the shield task
pub static SERVO_COMMANDS: Channel<CriticalSectionRawMutex, ServoCommand, SERVO_CHANNEL_SIZE> =
    Channel::new();
