//! Knob module handler
//!
//! Three rotary encoders with push buttons. The sensor loop feeds deltas
//! and button edges in as they happen; the controller drains them with
//! get-changes.

use moonpad_protocol::{CommandClass, KnobChanges, Reply, KNOB_CHANNELS};

use super::ModuleHandler;

/// Handler for the rotary encoder module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobsHandler {
    changes: KnobChanges,
}

impl KnobsHandler {
    /// Create a handler with an empty changes record
    pub const fn new() -> Self {
        Self {
            changes: KnobChanges::new(),
        }
    }

    /// Accumulate an encoder delta for one channel
    ///
    /// The delta comes from the quadrature decoder; the stored sum
    /// saturates at the i8 range instead of wrapping.
    pub fn record_rotation(&mut self, channel: usize, delta: i32) {
        self.changes.add_rotation(channel, delta);
    }

    /// Latch a button press edge
    pub fn record_press(&mut self, channel: usize) {
        self.changes.mark_pressed(channel);
    }

    /// Latch a button release edge
    pub fn record_release(&mut self, channel: usize) {
        self.changes.mark_released(channel);
    }

    /// The unreported changes (tests and diagnostics)
    pub fn changes(&self) -> &KnobChanges {
        &self.changes
    }
}

impl Default for KnobsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleHandler for KnobsHandler {
    const CLASS: CommandClass = CommandClass::Knobs;

    fn channel_count(&self) -> u8 {
        KNOB_CHANNELS as u8
    }

    fn take_changes(&mut self) -> Reply {
        let mut reply = Reply::new();
        // Cannot fail, the record is smaller than a reply
        let _ = reply.extend_from_slice(&self.changes.encode());
        self.changes.clear();
        reply
    }

    fn clear_changes(&mut self) {
        self.changes.clear();
    }
}
