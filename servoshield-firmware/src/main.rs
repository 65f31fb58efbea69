//! Servoshield - 32-Channel Servo Shield Firmware
//!
//! Firmware binary for RP2040 boards carrying the dual-PCA9685 servo
//! shield. Board settings come from shield.toml at build time.
//!
//! Wiring:
//! - I2C0: SDA = GPIO4, SCL = GPIO5
//! - SC1_OE (chip A) = GPIO9, SC2_OE (chip B) = GPIO8 (gating only)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use servoshield_drivers::adapters::{EhDelay, EhI2c, EhOutputPin};
use servoshield_drivers::shield::log::DefmtLogger;
use servoshield_drivers::{GatingPins, ServoShield};

use crate::config::{I2C_FREQUENCY_KHZ, READBACK, SHIELD_CONFIG};

mod channels;
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Servoshield firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup I2C0 for both PCA9685s
    let mut i2c_config = I2cConfig::default();
    let frequency = servoshield_hal::I2cConfig::from_khz(I2C_FREQUENCY_KHZ).frequency;
    i2c_config.frequency = frequency;
    let i2c = EhI2c(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config));
    info!("I2C initialized at {} Hz", frequency);

    let logger = if READBACK {
        DefmtLogger::with_readback()
    } else {
        DefmtLogger::new()
    };

    info!(
        "Shield addresses: chip A {=u8:#x}, chip B {=u8:#x}",
        SHIELD_CONFIG.addresses.chip_a, SHIELD_CONFIG.addresses.chip_b
    );

    // Spawn tasks
    if SHIELD_CONFIG.use_gating_pins {
        // OE lines start high so nothing moves before the first pulse write
        let sc1 = EhOutputPin(Output::new(p.PIN_9, Level::High));
        let sc2 = EhOutputPin(Output::new(p.PIN_8, Level::High));
        let shield: tasks::GatedShield = ServoShield::new(
            i2c,
            EhDelay(Delay),
            SHIELD_CONFIG,
            GatingPins::new(sc1, sc2),
        )
        .with_logger(logger);
        spawner.spawn(tasks::gated_shield_task(shield)).unwrap();
    } else {
        let shield: tasks::UngatedShield =
            ServoShield::without_gating(i2c, EhDelay(Delay), SHIELD_CONFIG.addresses)
                .with_logger(logger);
        spawner.spawn(tasks::ungated_shield_task(shield)).unwrap();
    }
    spawner.spawn(tasks::sweep_task()).unwrap();

    info!("All tasks spawned, system running");
}
