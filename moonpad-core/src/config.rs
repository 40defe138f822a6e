//! Deployment configuration types
//!
//! Tunables that differ between hardware revisions. The defaults are the
//! values the shipping boards use; nothing here is persisted (a module has
//! no non-volatile state, not even its bus address).

/// Slider sampling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderConfig {
    /// A sample must differ from the last reported value by more than
    /// this many raw ADC units before it is reported. Debounces pot
    /// wiper noise; not a protocol requirement.
    pub noise_threshold: u16,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self { noise_threshold: 3 }
    }
}

/// Master-arbitration timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArbiterConfig {
    /// Pause before the first sense-line sample, so the pullups settle
    pub line_settle_ms: u32,
    /// Interval between sense-line samples while waiting for a master
    pub poll_interval_ms: u32,
    /// Pause between routing commit and power-gate enable, giving the
    /// chosen master time to finish initializing
    pub settle_delay_ms: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            line_settle_ms: 10,
            poll_interval_ms: 10,
            settle_delay_ms: 500,
        }
    }
}
