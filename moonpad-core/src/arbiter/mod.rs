//! Master-line arbitration
//!
//! Several candidate controllers can sit on the helping-hand circuit; at
//! most one may ever drive the module bus. Each candidate advertises
//! itself on a dedicated sense line. The arbiter polls those lines with
//! bare GPIO reads (no bus traffic), and the first one found asserted
//! wins the bus for the whole power cycle.
//!
//! The commit is intentionally irreversible: the analog switch is routed
//! to the winner, every losing mux path is opened so no candidate can
//! leak signal back onto the bus, and only then does the one-way power
//! gate close the deal. The [`Arbiter`] is consumed by
//! [`Arbiter::arbitrate`], so no code path can re-run arbitration -
//! undoing it takes a full power cycle.

pub mod machine;

pub use machine::{first_asserted, ArbiterState};

use moonpad_hal::{DelayMs, InputPin, OutputPin};

use crate::config::ArbiterConfig;

/// Number of binary route-select lines on the analog switch
///
/// Two select bits route up to four candidates; the line count `N` must
/// not exceed that.
pub const SELECT_LINES: usize = 2;

/// Proof that arbitration committed, carrying the winner
///
/// There is deliberately no way back from this value to an [`Arbiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Committed {
    winner: u8,
}

impl Committed {
    /// Index of the line that won the bus
    pub fn winner(&self) -> u8 {
        self.winner
    }
}

/// The master-arbitration routine
///
/// `I` senses the candidate lines, `O` drives the mux switches, the
/// route-select pair and the power gate. Mux switches are active-open:
/// low means the path is closed (conducting nothing back out), high
/// means open.
pub struct Arbiter<I, O, D, const N: usize> {
    lines: [I; N],
    switches: [O; N],
    select: [O; SELECT_LINES],
    gate: O,
    delay: D,
    config: ArbiterConfig,
    state: ArbiterState,
}

impl<I, O, D, const N: usize> Arbiter<I, O, D, N>
where
    I: InputPin,
    O: OutputPin,
    D: DelayMs,
{
    /// Set up the arbiter with every mux switch closed
    ///
    /// Closing the switches up front keeps a candidate's own traffic
    /// from echoing back at it while arbitration is still pending.
    pub fn new(
        lines: [I; N],
        mut switches: [O; N],
        select: [O; SELECT_LINES],
        gate: O,
        delay: D,
        config: ArbiterConfig,
    ) -> Self {
        for switch in &mut switches {
            switch.set_low();
        }
        Self {
            lines,
            switches,
            select,
            gate,
            delay,
            config,
            state: ArbiterState::Waiting,
        }
    }

    /// Current arbitration state
    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// Sample every sense line once
    ///
    /// Resolves to the lowest asserted index, or stays in `Waiting` when
    /// nobody is asserted. Split out from [`Self::arbitrate`] so a test
    /// harness can drive the wait loop without blocking.
    pub fn poll_once(&mut self) -> ArbiterState {
        if self.state == ArbiterState::Waiting {
            let mut sample = [false; N];
            for (slot, line) in sample.iter_mut().zip(&self.lines) {
                *slot = line.is_high();
            }
            if let Some(winner) = first_asserted(&sample) {
                self.state = ArbiterState::Resolved(winner);
            }
        }
        self.state
    }

    /// Block until one candidate asserts, then commit the routing
    ///
    /// Polls at the configured interval with no timeout - when no line
    /// ever asserts this never returns, which is the fail-safe the
    /// circuit wants (unpowered bus over wrongly-powered bus). Consumes
    /// the arbiter; the returned [`Committed`] is the end of the road.
    pub fn arbitrate(mut self) -> Committed {
        self.delay.delay_ms(self.config.line_settle_ms);

        let winner = loop {
            if let ArbiterState::Resolved(winner) = self.poll_once() {
                break winner;
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        };

        self.commit(winner)
    }

    /// Route the switch network to the winner and seal it
    fn commit(mut self, winner: u8) -> Committed {
        // Route the analog switch to the winner's channel
        self.select[0].set_state(winner & 0x01 != 0);
        self.select[1].set_state((winner >> 1) & 0x01 != 0);

        // Open every losing mux path; keep the winner's closed
        for (index, switch) in self.switches.iter_mut().enumerate() {
            switch.set_state(index as u8 != winner);
        }

        // Give the chosen master time to finish initializing before the
        // gate hands it the bus
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.gate.set_high();

        self.state = ArbiterState::Terminal(winner);
        Committed { winner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakeLine<'a>(&'a Cell<bool>);

    impl InputPin for FakeLine<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    struct FakeSwitch<'a>(&'a Cell<bool>);

    impl OutputPin for FakeSwitch<'_> {
        fn set_high(&mut self) {
            self.0.set(true);
        }

        fn set_low(&mut self) {
            self.0.set(false);
        }

        fn is_set_high(&self) -> bool {
            self.0.get()
        }
    }

    struct FakeDelay<'a>(&'a Cell<u32>);

    impl DelayMs for FakeDelay<'_> {
        fn delay_ms(&mut self, ms: u32) {
            self.0.set(self.0.get() + ms);
        }
    }

    struct Harness {
        lines: [Cell<bool>; 4],
        switches: [Cell<bool>; 4],
        select: [Cell<bool>; SELECT_LINES],
        gate: Cell<bool>,
        elapsed: Cell<u32>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                lines: [const { Cell::new(false) }; 4],
                switches: [const { Cell::new(true) }; 4],
                select: [const { Cell::new(false) }; SELECT_LINES],
                gate: Cell::new(false),
                elapsed: Cell::new(0),
            }
        }

        fn arbiter(&self) -> Arbiter<FakeLine<'_>, FakeSwitch<'_>, FakeDelay<'_>, 4> {
            Arbiter::new(
                [
                    FakeLine(&self.lines[0]),
                    FakeLine(&self.lines[1]),
                    FakeLine(&self.lines[2]),
                    FakeLine(&self.lines[3]),
                ],
                [
                    FakeSwitch(&self.switches[0]),
                    FakeSwitch(&self.switches[1]),
                    FakeSwitch(&self.switches[2]),
                    FakeSwitch(&self.switches[3]),
                ],
                [FakeSwitch(&self.select[0]), FakeSwitch(&self.select[1])],
                FakeSwitch(&self.gate),
                FakeDelay(&self.elapsed),
                ArbiterConfig::default(),
            )
        }
    }

    #[test]
    fn test_new_closes_all_switches() {
        let harness = Harness::new();
        let _arbiter = harness.arbiter();
        assert!(harness.switches.iter().all(|s| !s.get()));
        assert!(!harness.gate.get());
    }

    #[test]
    fn test_resolves_the_only_asserted_line() {
        let harness = Harness::new();
        harness.lines[2].set(true);

        let committed = harness.arbiter().arbitrate();
        assert_eq!(committed.winner(), 2);

        // Losing paths opened, winner kept closed, gate enabled
        assert!(harness.switches[0].get());
        assert!(harness.switches[1].get());
        assert!(!harness.switches[2].get());
        assert!(harness.switches[3].get());
        assert!(harness.gate.get());

        // Select lines binary-encode channel 2
        assert!(!harness.select[0].get());
        assert!(harness.select[1].get());
    }

    #[test]
    fn test_simultaneous_assert_takes_lowest_index() {
        let harness = Harness::new();
        harness.lines[1].set(true);
        harness.lines[3].set(true);

        let committed = harness.arbiter().arbitrate();
        assert_eq!(committed.winner(), 1);
        assert!(!harness.switches[1].get());
        assert!(harness.switches[3].get());
    }

    #[test]
    fn test_waits_while_nothing_asserted() {
        let harness = Harness::new();
        let mut arbiter = harness.arbiter();

        for _ in 0..100 {
            assert_eq!(arbiter.poll_once(), ArbiterState::Waiting);
        }
        assert!(!harness.gate.get());
    }

    #[test]
    fn test_poll_once_latches_the_winner() {
        let harness = Harness::new();
        let mut arbiter = harness.arbiter();

        harness.lines[0].set(true);
        assert_eq!(arbiter.poll_once(), ArbiterState::Resolved(0));

        // A later-asserting rival cannot steal the win
        harness.lines[0].set(false);
        harness.lines[1].set(true);
        assert_eq!(arbiter.poll_once(), ArbiterState::Resolved(0));
    }

    #[test]
    fn test_commit_waits_for_settle_delay() {
        let harness = Harness::new();
        harness.lines[0].set(true);

        let _committed = harness.arbiter().arbitrate();
        let config = ArbiterConfig::default();
        assert!(harness.elapsed.get() >= config.line_settle_ms + config.settle_delay_ms);
    }
}
