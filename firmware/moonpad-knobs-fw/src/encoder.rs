//! Rotary encoder decoding
//!
//! Decodes quadrature signals into signed detent deltas. Uses a small
//! state machine for reliable decoding with noise rejection.

use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

/// Encoder state machine states
#[derive(Clone, Copy, PartialEq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature encoder decoder for one channel
pub struct Encoder<'d> {
    a: Input<'d>,
    b: Input<'d>,
    state: State,
    last_a: bool,
    last_b: bool,
}

impl<'d> Encoder<'d> {
    /// Create a decoder from the channel's A/B inputs
    pub fn new(a: Input<'d>, b: Input<'d>) -> Self {
        let last_a = a.is_high();
        let last_b = b.is_high();

        Self {
            a,
            b,
            state: State::Idle,
            last_a,
            last_b,
        }
    }

    /// Poll for one detent of rotation
    ///
    /// Returns `+1` for clockwise, `-1` for counter-clockwise. Should be
    /// called continuously; it paces itself with a short delay per poll.
    pub async fn poll(&mut self) -> Option<i32> {
        // Small delay between polls
        Timer::after(Duration::from_millis(2)).await;

        let a = self.a.is_high();
        let b = self.b.is_high();

        // No change
        if a == self.last_a && b == self.last_b {
            return None;
        }

        let delta = self.decode(a, b);

        self.last_a = a;
        self.last_b = b;

        delta
    }

    /// Decode encoder state using the state machine
    ///
    /// Quadrature encoding:
    /// CW:  A leads B (A changes first when rotating clockwise)
    /// CCW: B leads A (B changes first when rotating counter-clockwise)
    fn decode(&mut self, a: bool, b: bool) -> Option<i32> {
        match self.state {
            State::Idle => {
                if !a && b {
                    // A fell first -> CW direction
                    self.state = State::CwStep1;
                } else if a && !b {
                    // B fell first -> CCW direction
                    self.state = State::CcwStep1;
                }
                None
            }
            State::CwStep1 => {
                if !a && !b {
                    // Both low -> continue CW
                    self.state = State::CwStep2;
                } else if a && b {
                    // Back to idle (noise/bounce)
                    self.state = State::Idle;
                }
                None
            }
            State::CwStep2 => {
                if a || b {
                    // Either went high -> complete CW detent
                    self.state = State::Idle;
                    return Some(1);
                }
                None
            }
            State::CcwStep1 => {
                if !a && !b {
                    // Both low -> continue CCW
                    self.state = State::CcwStep2;
                } else if a && b {
                    // Back to idle (noise/bounce)
                    self.state = State::Idle;
                }
                None
            }
            State::CcwStep2 => {
                if a || b {
                    // Either went high -> complete CCW detent
                    self.state = State::Idle;
                    return Some(-1);
                }
                None
            }
        }
    }
}
