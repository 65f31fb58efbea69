//! Sweep demo task
//!
//! Moves every servo back and forth between the configured limits.

use defmt::*;
use embassy_time::{Duration, Ticker};

use servoshield_core::ChannelId;

use crate::channels::{ServoCommand, SERVO_COMMANDS};
use crate::config::{SWEEP_INTERVAL_MS, SWEEP_MAX_US, SWEEP_MIN_US, SWEEP_STEP_US};

/// Sweep task - queues one pulse per servo on every tick
#[embassy_executor::task]
pub async fn sweep_task() {
    info!(
        "Sweep task started: {}-{}us, step {}us every {}ms",
        SWEEP_MIN_US, SWEEP_MAX_US, SWEEP_STEP_US, SWEEP_INTERVAL_MS
    );

    // Park every servo at the start position before unmuting
    for channel in ChannelId::ALL {
        SERVO_COMMANDS
            .send(ServoCommand::SetPulse {
                channel,
                pulse_us: SWEEP_MIN_US,
            })
            .await;
    }
    SERVO_COMMANDS.send(ServoCommand::EnableOutputs).await;

    let mut ticker = Ticker::every(Duration::from_millis(SWEEP_INTERVAL_MS));
    let mut sweep = Sweep::new(SWEEP_MIN_US, SWEEP_MAX_US, SWEEP_STEP_US);

    loop {
        ticker.next().await;

        let pulse_us = sweep.pulse_us();
        for channel in ChannelId::ALL {
            SERVO_COMMANDS
                .send(ServoCommand::SetPulse { channel, pulse_us })
                .await;
        }

        sweep.advance();
    }
}

/// Triangle wave between two pulse widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    min_us: u32,
    max_us: u32,
    step_us: u32,
    pulse_us: u32,
    rising: bool,
}

impl Sweep {
    /// Start at `min_us`, moving up
    const fn new(min_us: u32, max_us: u32, step_us: u32) -> Self {
        Self {
            min_us,
            max_us,
            step_us,
            pulse_us: min_us,
            rising: true,
        }
    }

    /// Current pulse width
    const fn pulse_us(&self) -> u32 {
        self.pulse_us
    }

    /// Move one step, turning around at either limit
    fn advance(&mut self) {
        if self.rising {
            let next = self.pulse_us.saturating_add(self.step_us);
            if next >= self.max_us {
                self.pulse_us = self.max_us;
                self.rising = false;
            } else {
                self.pulse_us = next;
            }
        } else {
            let next = self.pulse_us.saturating_sub(self.step_us);
            if next <= self.min_us {
                self.pulse_us = self.min_us;
                self.rising = true;
            } else {
                self.pulse_us = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_turns_at_max() {
        let mut sweep = Sweep::new(1000, 1030, 10);
        let mut seen = [0u32; 6];
        for slot in seen.iter_mut() {
            *slot = sweep.pulse_us();
            sweep.advance();
        }
        assert_eq!(seen, [1000, 1010, 1020, 1030, 1020, 1010]);
    }

    #[test]
    fn test_sweep_turns_at_min() {
        let mut sweep = Sweep::new(1000, 1020, 10);
        for _ in 0..4 {
            sweep.advance();
        }
        // 1010, 1020, 1010, 1000
        assert_eq!(sweep.pulse_us(), 1000);
        sweep.advance();
        assert_eq!(sweep.pulse_us(), 1010);
    }

    #[test]
    fn test_sweep_clamps_uneven_step() {
        let mut sweep = Sweep::new(1000, 1025, 10);
        sweep.advance();
        sweep.advance();
        sweep.advance();
        assert_eq!(sweep.pulse_us(), 1025);
        sweep.advance();
        assert_eq!(sweep.pulse_us(), 1015);
    }

    #[test]
    fn test_sweep_min_equals_max() {
        let mut sweep = Sweep::new(1500, 1500, 10);
        for _ in 0..5 {
            sweep.advance();
            assert_eq!(sweep.pulse_us(), 1500);
        }
    }
}
