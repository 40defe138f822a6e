//! Board-agnostic core logic for moonpad module firmware
//!
//! This crate contains everything between the wire protocol and the chip
//! HAL:
//!
//! - The base-command dispatcher (identity readback, live address swap)
//! - The `ModuleHandler` trait and the knob/slider handlers
//! - Deployment configuration types
//! - The master-arbitration state machine for the helping-hand circuit
//!
//! Nothing in here touches hardware directly; firmware binaries drive the
//! dispatcher from their bus session loop and hand the arbiter concrete
//! pins through the `moonpad-hal` traits.

#![no_std]
#![deny(unsafe_code)]

pub mod arbiter;
pub mod config;
pub mod dispatch;
pub mod module;
