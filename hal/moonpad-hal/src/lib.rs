//! Moonpad Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the board-agnostic crates are
//! written against. Firmware binaries implement them over the chip HAL
//! (embassy-rp today); host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  moonpad-core (dispatcher, arbiter)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  moonpad-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ firmware bins │       │  test mocks   │
//! │ (embassy-rp)  │       │  (host)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`], [`gpio::OutputPin`] - Digital I/O
//! - [`delay::DelayMs`] - Blocking millisecond delay
//! - [`identity::SerialSource`] - Hardware-unique serial number

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod identity;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::{InputPin, OutputPin};
pub use identity::{SerialSource, UNIQUE_SERIAL_LEN};
