//! Module handlers
//!
//! A module handler owns the changes record for one module kind and
//! interprets the module-class commands against it. The dispatcher
//! forwards every non-base frame here; a handler ignores any frame whose
//! class byte is not its own, so a bus with mixed traffic stays quiet.

pub mod knobs;
pub mod sliders;

pub use knobs::KnobsHandler;
pub use sliders::SlidersHandler;

use moonpad_protocol::{CommandClass, Frame, ModuleCommand, Reply};

/// Capability set every module kind implements
///
/// `on_receive` and `on_request` have default implementations covering
/// the shared opcode numbering (get-changes, clear-changes, channel
/// count); a variant only supplies its class tag and record operations.
/// Variants with extra receive-triggered opcodes override the hooks and
/// fall back to these defaults for the shared ones.
pub trait ModuleHandler {
    /// Command class this module answers to
    const CLASS: CommandClass;

    /// Number of active channels on this module
    fn channel_count(&self) -> u8;

    /// Encode the changes record into a reply and zero it
    ///
    /// Read and reset are one operation: nothing may recompute or touch
    /// the record between the encode and the clear, or deltas would
    /// double-count across read cycles.
    fn take_changes(&mut self) -> Reply;

    /// Zero the changes record without reading it
    fn clear_changes(&mut self);

    /// Inbound frame hook (controller wrote to the module)
    fn on_receive(&mut self, frame: &Frame) {
        if frame.class() != Self::CLASS.to_byte() {
            return;
        }
        if let Some(ModuleCommand::ClearChanges) = ModuleCommand::from_byte(frame.opcode()) {
            self.clear_changes();
        }
    }

    /// Outbound request hook (controller reads from the module)
    ///
    /// Returns the reply bytes, or `None` when the frame is not ours or
    /// carries an opcode with no reply.
    fn on_request(&mut self, frame: &Frame) -> Option<Reply> {
        if frame.class() != Self::CLASS.to_byte() {
            return None;
        }
        match ModuleCommand::from_byte(frame.opcode())? {
            ModuleCommand::GetChanges => Some(self.take_changes()),
            ModuleCommand::ClearChanges => None,
            ModuleCommand::ChannelCount => {
                let mut reply = Reply::new();
                // Cannot fail, a reply holds more than one byte
                let _ = reply.push(self.channel_count());
                Some(reply)
            }
        }
    }
}
