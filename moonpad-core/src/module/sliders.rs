//! Slider module handler
//!
//! Two analog sliders. The sampling loop feeds raw ADC readings in; a
//! channel is only reported when the reading moved past the configured
//! noise threshold relative to the last *reported* value, so wiper noise
//! does not spam the controller.

use moonpad_protocol::{CommandClass, Reply, SliderChanges, SLIDER_CHANNELS};

use crate::config::SliderConfig;

use super::ModuleHandler;

/// Handler for the analog slider module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlidersHandler {
    changes: SliderChanges,
    last_reported: [u16; SLIDER_CHANNELS],
    config: SliderConfig,
}

impl SlidersHandler {
    /// Create a handler with an empty changes record
    pub fn new(config: SliderConfig) -> Self {
        Self {
            changes: SliderChanges::new(),
            last_reported: [0; SLIDER_CHANNELS],
            config,
        }
    }

    /// Feed one raw ADC sample for a channel
    ///
    /// Below-threshold movement leaves both the stored value and the
    /// changed flag untouched. The reference point is the last value the
    /// controller was offered, not the last raw sample, so slow drift
    /// still crosses the threshold eventually.
    pub fn record_sample(&mut self, channel: usize, value: u16) {
        if channel >= SLIDER_CHANNELS {
            return;
        }
        if value.abs_diff(self.last_reported[channel]) > self.config.noise_threshold {
            self.changes.set_value(channel, value);
            self.last_reported[channel] = value;
        }
    }

    /// The unreported changes (tests and diagnostics)
    pub fn changes(&self) -> &SliderChanges {
        &self.changes
    }
}

impl Default for SlidersHandler {
    fn default() -> Self {
        Self::new(SliderConfig::default())
    }
}

impl ModuleHandler for SlidersHandler {
    const CLASS: CommandClass = CommandClass::Sliders;

    fn channel_count(&self) -> u8 {
        SLIDER_CHANNELS as u8
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

#[cfg(test)]
mod tests {
    use super::*;
    use moonpad_protocol::command::{CLASS_SLIDERS, MODULE_CHANNEL_COUNT, MODULE_GET_CHANGES};
    use moonpad_protocol::Frame;

    #[test]
    fn test_threshold_gates_reporting() {
        let mut handler = SlidersHandler::default();

        // 3 raw units is not "more than 3"
        handler.record_sample(0, 3);
        assert!(!handler.changes().is_changed(0));
        assert_eq!(handler.changes().value(0), 0);

        handler.record_sample(0, 4);
        assert!(handler.changes().is_changed(0));
        assert_eq!(handler.changes().value(0), 4);
    }

    #[test]
    fn test_threshold_relative_to_last_reported() {
        let mut handler = SlidersHandler::default();
        handler.record_sample(0, 100);

        // Wiggle around the reported value: stays quiet
        handler.record_sample(0, 102);
        handler.record_sample(0, 98);
        assert_eq!(handler.changes().value(0), 100);

        // Slow drift eventually crosses the threshold
        handler.record_sample(0, 104);
        assert_eq!(handler.changes().value(0), 104);
    }

    #[test]
    fn test_get_changes_clears_flags_not_reference() {
        let mut handler = SlidersHandler::default();
        handler.record_sample(1, 200);

        let frame = Frame::new(CLASS_SLIDERS, MODULE_GET_CHANGES, 0);
        let reply = handler.on_request(&frame).unwrap();
        assert_eq!(&reply[..], &[0, 0, 200, 0, 0, 1]);

        // Record is zeroed...
        let reply = handler.on_request(&frame).unwrap();
        assert_eq!(&reply[..], &[0u8; SliderChanges::ENCODED_LEN]);

        // ...but the reported reference survives the read, so the same
        // position does not re-report
        handler.record_sample(1, 201);
        assert!(!handler.changes().is_changed(1));
    }

    #[test]
    fn test_custom_threshold() {
        let mut handler = SlidersHandler::new(SliderConfig { noise_threshold: 10 });
        handler.record_sample(0, 10);
        assert!(!handler.changes().is_changed(0));
        handler.record_sample(0, 11);
        assert!(handler.changes().is_changed(0));
    }

    #[test]
    fn test_channel_count() {
        let mut handler = SlidersHandler::default();
        let frame = Frame::new(CLASS_SLIDERS, MODULE_CHANNEL_COUNT, 0);
        let reply = handler.on_request(&frame).unwrap();
        assert_eq!(&reply[..], &[SLIDER_CHANNELS as u8]);
    }
}
