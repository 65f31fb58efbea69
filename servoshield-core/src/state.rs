//! Per-chip initialization state machine
//!
//! ```text
//! Uninitialized ──ModeSleep──▶ Sleeping ──Prescale──▶ PrescaleSet ──ModeWake──▶ Running
//!                                 ▲                                               │
//!                                 └────────────────── ModeSleep ──────────────────┘
//! ```
//!
//! PRE_SCALE is silently ignored by the chip unless the oscillator is
//! asleep, so a prescale step from any state but `Sleeping` does not
//! advance.

/// Initialization progress of one PCA9685
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipState {
    /// Power-on, nothing written yet
    #[default]
    Uninitialized,
    /// MODE1 written with SLEEP set, oscillator stopped
    Sleeping,
    /// PRE_SCALE written while asleep
    PrescaleSet,
    /// Oscillator running, auto-increment enabled
    Running,
}

/// Register write completed during initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// MODE1 := SLEEP | ALLCALL
    ModeSleep,
    /// PRE_SCALE := 121
    Prescale,
    /// MODE1 := AI | ALLCALL
    ModeWake,
}

impl ChipState {
    /// Check if PRE_SCALE writes take effect in this state
    pub fn prescale_allowed(&self) -> bool {
        matches!(self, ChipState::Sleeping)
    }

    /// Check if the chip is generating PWM
    pub fn is_running(&self) -> bool {
        matches!(self, ChipState::Running)
    }

    /// Apply a completed init write and return the next state
    pub fn transition(self, step: InitStep) -> Self {
        use ChipState::*;
        use InitStep::*;

        match (self, step) {
            // Sleeping is reachable from anywhere; re-initialization starts here
            (_, ModeSleep) => Sleeping,
            (Sleeping, Prescale) => PrescaleSet,
            (PrescaleSet, ModeWake) => Running,

            // Out-of-order writes leave the state unchanged
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_flow() {
        let state = ChipState::default()
            .transition(InitStep::ModeSleep)
            .transition(InitStep::Prescale)
            .transition(InitStep::ModeWake);
        assert_eq!(state, ChipState::Running);
        assert!(state.is_running());
    }

    #[test]
    fn test_prescale_requires_sleep() {
        assert!(!ChipState::Uninitialized.prescale_allowed());
        assert!(ChipState::Sleeping.prescale_allowed());
        assert!(!ChipState::Running.prescale_allowed());

        assert_eq!(
            ChipState::Uninitialized.transition(InitStep::Prescale),
            ChipState::Uninitialized
        );
        assert_eq!(
            ChipState::Running.transition(InitStep::Prescale),
            ChipState::Running
        );
    }

    #[test]
    fn test_wake_without_prescale_does_not_run() {
        assert_eq!(
            ChipState::Sleeping.transition(InitStep::ModeWake),
            ChipState::Sleeping
        );
    }

    #[test]
    fn test_reinit_from_running() {
        assert_eq!(
            ChipState::Running.transition(InitStep::ModeSleep),
            ChipState::Sleeping
        );
    }
}
