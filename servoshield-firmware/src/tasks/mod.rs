//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod shield;
pub mod sweep;

pub use shield::{gated_shield_task, ungated_shield_task, GatedShield, UngatedShield};
pub use sweep::sweep_task;
