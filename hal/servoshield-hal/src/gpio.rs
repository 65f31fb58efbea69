//! GPIO pin abstractions
//!
//! Only digital outputs are needed: the shield's two output-enable lines.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Put the pin in output mode
    ///
    /// HALs whose pin types are already outputs (typestate) can rely on the
    /// default no-op.
    fn configure_as_output(&mut self) {}

    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Placeholder pin for shields built without output-enable gating
///
/// It is never driven; the driver refuses gating requests before reaching
/// the pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoPin;

impl OutputPin for NoPin {
    fn set_high(&mut self) {}

    fn set_low(&mut self) {}
}
