//! Blocking delay abstraction
//!
//! The arbiter is the only busy-waiting code in the system; it polls its
//! sense lines at a fixed interval and pauses for hardware settle times.

/// Blocking millisecond delay
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
