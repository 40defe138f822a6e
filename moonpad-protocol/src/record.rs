//! Per-module changes records
//!
//! A changes record accumulates everything a module has to report since
//! the controller last asked: encoder deltas and button edges for knobs,
//! sampled values and changed flags for sliders. The record is read and
//! zeroed in one step (get-changes), so deltas are never double-counted
//! across two read cycles.
//!
//! Multi-byte fields are little-endian on the wire, the native order of
//! every deployed target.

/// Number of encoder channels on a knob module
pub const KNOB_CHANNELS: usize = 3;

/// Number of slider channels on a slider module
pub const SLIDER_CHANNELS: usize = 2;

/// Unreported knob-module state
///
/// Wire layout: `[delta; 3][pressed; 3][released; 3]`, one byte each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobChanges {
    rotation_delta: [i8; KNOB_CHANNELS],
    button_pressed: [u8; KNOB_CHANNELS],
    button_released: [u8; KNOB_CHANNELS],
}

impl KnobChanges {
    /// Encoded size in bytes
    pub const ENCODED_LEN: usize = 3 * KNOB_CHANNELS;

    /// An all-zero record
    pub const fn new() -> Self {
        Self {
            rotation_delta: [0; KNOB_CHANNELS],
            button_pressed: [0; KNOB_CHANNELS],
            button_released: [0; KNOB_CHANNELS],
        }
    }

    /// Accumulate a rotation delta for one channel
    ///
    /// The stored delta saturates at the i8 range; values beyond
    /// +127/-128 clamp, they never wrap.
    pub fn add_rotation(&mut self, channel: usize, delta: i32) {
        if channel >= KNOB_CHANNELS {
            return;
        }
        let sum = (self.rotation_delta[channel] as i32)
            .saturating_add(delta)
            .clamp(i8::MIN as i32, i8::MAX as i32);
        self.rotation_delta[channel] = sum as i8;
    }

    /// Latch a press edge for one channel (one-shot, cleared on read)
    pub fn mark_pressed(&mut self, channel: usize) {
        if channel < KNOB_CHANNELS {
            self.button_pressed[channel] = 1;
        }
    }

    /// Latch a release edge for one channel (one-shot, cleared on read)
    pub fn mark_released(&mut self, channel: usize) {
        if channel < KNOB_CHANNELS {
            self.button_released[channel] = 1;
        }
    }

    /// Accumulated delta for one channel
    pub fn rotation_delta(&self, channel: usize) -> i8 {
        self.rotation_delta[channel]
    }

    /// Zero the whole record
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Encode the record into its wire image
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for i in 0..KNOB_CHANNELS {
            out[i] = self.rotation_delta[i] as u8;
            out[KNOB_CHANNELS + i] = self.button_pressed[i];
            out[2 * KNOB_CHANNELS + i] = self.button_released[i];
        }
        out
    }
}

impl Default for KnobChanges {
    fn default() -> Self {
        Self::new()
    }
}

/// Unreported slider-module state
///
/// Wire layout: `[value u16 le; 2][changed; 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderChanges {
    value: [u16; SLIDER_CHANNELS],
    changed: [u8; SLIDER_CHANNELS],
}

impl SliderChanges {
    /// Encoded size in bytes
    pub const ENCODED_LEN: usize = 2 * SLIDER_CHANNELS + SLIDER_CHANNELS;

    /// An all-zero record
    pub const fn new() -> Self {
        Self {
            value: [0; SLIDER_CHANNELS],
            changed: [0; SLIDER_CHANNELS],
        }
    }

    /// Store a fresh sample and set the channel's changed flag
    pub fn set_value(&mut self, channel: usize, value: u16) {
        if channel >= SLIDER_CHANNELS {
            return;
        }
        self.value[channel] = value;
        self.changed[channel] = 1;
    }

    /// Last stored value for one channel
    pub fn value(&self, channel: usize) -> u16 {
        self.value[channel]
    }

    /// Whether the channel changed since the last read
    pub fn is_changed(&self, channel: usize) -> bool {
        self.changed[channel] != 0
    }

    /// Zero the whole record
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Encode the record into its wire image
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for i in 0..SLIDER_CHANNELS {
            let le = self.value[i].to_le_bytes();
            out[2 * i] = le[0];
            out[2 * i + 1] = le[1];
            out[2 * SLIDER_CHANNELS + i] = self.changed[i];
        }
        out
    }
}

impl Default for SliderChanges {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knob_accumulate() {
        let mut changes = KnobChanges::new();
        changes.add_rotation(0, 5);
        changes.add_rotation(0, 5);
        changes.add_rotation(2, -3);

        assert_eq!(changes.rotation_delta(0), 10);
        assert_eq!(changes.rotation_delta(1), 0);
        assert_eq!(changes.rotation_delta(2), -3);
    }

    #[test]
    fn test_knob_saturates_positive() {
        let mut changes = KnobChanges::new();
        for _ in 0..50 {
            changes.add_rotation(0, 100);
        }
        assert_eq!(changes.rotation_delta(0), 127);
    }

    #[test]
    fn test_knob_saturates_negative() {
        let mut changes = KnobChanges::new();
        for _ in 0..50 {
            changes.add_rotation(1, -100);
        }
        assert_eq!(changes.rotation_delta(1), -128);
    }

    #[test]
    fn test_knob_encode_layout() {
        let mut changes = KnobChanges::new();
        changes.add_rotation(0, 10);
        changes.mark_pressed(0);
        changes.mark_released(2);

        let bytes = changes.encode();
        assert_eq!(bytes, [10, 0, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_knob_negative_delta_on_wire() {
        let mut changes = KnobChanges::new();
        changes.add_rotation(1, -2);
        let bytes = changes.encode();
        assert_eq!(bytes[1] as i8, -2);
    }

    #[test]
    fn test_knob_clear() {
        let mut changes = KnobChanges::new();
        changes.add_rotation(0, 3);
        changes.mark_pressed(1);
        changes.clear();
        assert_eq!(changes, KnobChanges::new());
    }

    #[test]
    fn test_knob_out_of_range_channel_ignored() {
        let mut changes = KnobChanges::new();
        changes.add_rotation(KNOB_CHANNELS, 5);
        changes.mark_pressed(KNOB_CHANNELS);
        assert_eq!(changes, KnobChanges::new());
    }

    #[test]
    fn test_slider_encode_layout() {
        let mut changes = SliderChanges::new();
        changes.set_value(0, 0x0321);
        changes.set_value(1, 0x00FF);

        let bytes = changes.encode();
        assert_eq!(bytes, [0x21, 0x03, 0xFF, 0x00, 1, 1]);
    }

    #[test]
    fn test_slider_clear_keeps_nothing() {
        let mut changes = SliderChanges::new();
        changes.set_value(1, 512);
        changes.clear();
        assert!(!changes.is_changed(1));
        assert_eq!(changes.value(1), 0);
    }
}
