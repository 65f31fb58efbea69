//! Shield task
//!
//! Sole owner of the servo shield. Brings both chips up, then drains
//! `SERVO_COMMANDS` and applies each command in order.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Timer};

use servoshield_drivers::adapters::{EhDelay, EhI2c, EhOutputPin};
use servoshield_drivers::shield::log::DefmtLogger;
use servoshield_drivers::ServoShield;
use servoshield_hal::gpio::NoPin;
use servoshield_hal::OutputPin;

use crate::channels::{ServoCommand, SERVO_COMMANDS};

/// Delay between initialization attempts when the bus does not answer
const INIT_RETRY_MS: u64 = 1000;

/// I2C0 as wired on this board
pub type ShieldBus = EhI2c<I2c<'static, I2C0, Blocking>>;

/// Blocking delay used by the init sequence
pub type ShieldDelay = EhDelay<Delay>;

/// Shield with SC1_OE / SC2_OE wired to GPIO9 / GPIO8
pub type GatedShield =
    ServoShield<ShieldBus, EhOutputPin<Output<'static>>, ShieldDelay, DefmtLogger>;

/// Shield with the OE jumpers open; GPIO9 / GPIO8 stay unclaimed
pub type UngatedShield = ServoShield<ShieldBus, NoPin, ShieldDelay, DefmtLogger>;

/// Shield task for boards using output-enable gating
#[embassy_executor::task]
pub async fn gated_shield_task(shield: GatedShield) {
    serve(shield).await;
}

/// Shield task for boards without output-enable gating
#[embassy_executor::task]
pub async fn ungated_shield_task(shield: UngatedShield) {
    serve(shield).await;
}

/// Initialize the shield, then apply queued servo commands
///
/// Init is retried until both chips answer. Bus errors on pulse writes
/// are logged and the command dropped; the task keeps running.
async fn serve<P: OutputPin>(mut shield: ServoShield<ShieldBus, P, ShieldDelay, DefmtLogger>) {
    info!("Shield task started");

    while let Err(e) = shield.initialize() {
        warn!("Shield initialization failed: {:?}, retrying", e);
        Timer::after(Duration::from_millis(INIT_RETRY_MS)).await;
    }

    if !shield.gating_enabled() {
        info!("Gating pins not used, outputs always active");
    }

    loop {
        let command = SERVO_COMMANDS.receive().await;

        match command {
            ServoCommand::SetPulse { channel, pulse_us } => {
                if let Err(e) = shield.set_servo_pulse_duration(channel, pulse_us) {
                    warn!("Pulse write to {} failed: {:?}", channel, e);
                }
            }
            ServoCommand::EnableOutputs => {
                if shield.enable_pwm_outputs().is_err() {
                    debug!("Enable ignored: no gating pins");
                }
            }
        }
    }
}
