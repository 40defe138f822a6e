//! Moonpad Module Bus Protocol
//!
//! This crate defines the command protocol spoken between the macropad
//! controller and its plug-in modules (knobs, sliders, ...) over the shared
//! two-wire bus. The protocol is deliberately tiny: fixed single-byte
//! opcodes, no framing overhead, no retransmission (the bus hardware and
//! the controller are responsible for retries).
//!
//! # Command frame
//!
//! Every inbound command is at most 3 bytes:
//!
//! ```text
//! ┌───────┬────────┬──────────┐
//! │ CLASS │ OPCODE │ ARGUMENT │
//! │ 1B    │ 1B     │ 0-1B     │
//! └───────┴────────┴──────────┘
//! ```
//!
//! CLASS selects who interprets the rest: `0x00` is the base protocol
//! (identity and address management, handled before any module code runs),
//! other values name a module kind. Missing trailing bytes read as zero,
//! and opcode zero is a defined no-op in every class.
//!
//! Replies are raw byte images of whatever is being read back: the 11-byte
//! friend code, a changes record, or a one-byte channel count.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod identity;
pub mod record;

pub use command::{BaseCommand, BusAddress, CommandClass, ModuleCommand};
pub use frame::{Frame, Reply, FRAME_LEN, MAX_REPLY_LEN};
pub use identity::{FriendCode, ModuleType, FRIEND_CODE_LEN};
pub use record::{KnobChanges, SliderChanges, KNOB_CHANNELS, SLIDER_CHANNELS};
