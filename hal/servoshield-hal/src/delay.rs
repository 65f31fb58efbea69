//! Blocking delays

/// Blocking millisecond delay
///
/// The shield needs one uninterruptible wait after waking the PWM
/// oscillators. Nothing else in the driver sleeps.
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<T: DelayMs + ?Sized> DelayMs for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }
}
