//! Command classes, opcodes and the bus address
//!
//! Byte 0 of a frame selects the command class, byte 1 the opcode within
//! it. Base commands are reserved for identity and address management and
//! are handled before any module-specific code runs. Unknown opcodes are
//! silently ignored everywhere - there is no NACK-with-reason on this bus;
//! the controller detects a dead command by timing out.

use crate::frame::Frame;

// Command class IDs (frame byte 0)
pub const CLASS_BASE: u8 = 0x00;
pub const CLASS_KNOBS: u8 = 0x01;
pub const CLASS_SLIDERS: u8 = 0x02;

// Base opcodes (frame byte 1 when class is base)
pub const BASE_FRIEND_CODE: u8 = 0x01;
pub const BASE_SWAP_ADDRESS: u8 = 0x02;

// Module opcodes (frame byte 1 for any module class)
pub const MODULE_GET_CHANGES: u8 = 0x01;
pub const MODULE_CLEAR_CHANGES: u8 = 0x02;
pub const MODULE_CHANNEL_COUNT: u8 = 0x03;

/// Well-known command classes
///
/// The class byte space is open-ended: a frame whose class is not listed
/// here is still forwarded to the active module handler, which ignores it
/// if it is not its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandClass {
    /// Identity and address management
    Base,
    /// Knob module commands
    Knobs,
    /// Slider module commands
    Sliders,
}

impl CommandClass {
    /// Parse a class from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CLASS_BASE => Some(CommandClass::Base),
            CLASS_KNOBS => Some(CommandClass::Knobs),
            CLASS_SLIDERS => Some(CommandClass::Sliders),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            CommandClass::Base => CLASS_BASE,
            CommandClass::Knobs => CLASS_KNOBS,
            CommandClass::Sliders => CLASS_SLIDERS,
        }
    }
}

/// 7-bit address of a module on the shared bus
///
/// Fresh modules come up on [`BusAddress::DEFAULT`]; the controller moves
/// them to a free address with a swap command during discovery. The
/// address lives for one power cycle only - it is never written to
/// non-volatile storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

impl BusAddress {
    /// Address every module boots with
    pub const DEFAULT: Self = Self(0x03);

    /// Build an address from a raw frame byte
    ///
    /// Masks to 7 bits; beyond that the sender is trusted (no in-use or
    /// reserved-range validation happens module-side).
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & 0x7F)
    }

    /// The raw 7-bit value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for BusAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parsed base-class command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaseCommand {
    /// Read back the 11-byte friend code on the next bus read
    FriendCode,
    /// Rebind the bus session to a new address
    SwapAddress(BusAddress),
}

impl BaseCommand {
    /// Parse a base command from a frame
    ///
    /// Returns `None` when the frame is not base class or carries an
    /// unknown opcode (including the zero no-op).
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        if frame.class() != CLASS_BASE {
            return None;
        }
        match frame.opcode() {
            BASE_FRIEND_CODE => Some(BaseCommand::FriendCode),
            BASE_SWAP_ADDRESS => Some(BaseCommand::SwapAddress(BusAddress::from_raw(
                frame.argument(),
            ))),
            _ => None,
        }
    }
}

/// Parsed module-class opcode
///
/// All module kinds share the same opcode numbering; only the record
/// layout of the reply differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleCommand {
    /// Return the changes record and zero it in the same step
    GetChanges,
    /// Zero the changes record without reading it
    ClearChanges,
    /// Return the number of active channels as one byte
    ChannelCount,
}

impl ModuleCommand {
    /// Parse a module opcode from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MODULE_GET_CHANGES => Some(ModuleCommand::GetChanges),
            MODULE_CLEAR_CHANGES => Some(ModuleCommand::ClearChanges),
            MODULE_CHANNEL_COUNT => Some(ModuleCommand::ChannelCount),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_roundtrip() {
        for class in [CommandClass::Base, CommandClass::Knobs, CommandClass::Sliders] {
            assert_eq!(CommandClass::from_byte(class.to_byte()), Some(class));
        }
        assert_eq!(CommandClass::from_byte(0x7E), None);
    }

    #[test]
    fn test_address_masks_to_seven_bits() {
        assert_eq!(BusAddress::from_raw(0x85).get(), 0x05);
        assert_eq!(BusAddress::from_raw(0x77).get(), 0x77);
    }

    #[test]
    fn test_default_address() {
        assert_eq!(BusAddress::default().get(), 0x03);
    }

    #[test]
    fn test_parse_friend_code() {
        let frame = Frame::new(CLASS_BASE, BASE_FRIEND_CODE, 0x00);
        assert_eq!(BaseCommand::from_frame(&frame), Some(BaseCommand::FriendCode));
    }

    #[test]
    fn test_parse_swap_address() {
        let frame = Frame::new(CLASS_BASE, BASE_SWAP_ADDRESS, 0x42);
        assert_eq!(
            BaseCommand::from_frame(&frame),
            Some(BaseCommand::SwapAddress(BusAddress::from_raw(0x42)))
        );
    }

    #[test]
    fn test_base_parse_rejects_other_classes() {
        let frame = Frame::new(CLASS_KNOBS, BASE_FRIEND_CODE, 0x00);
        assert_eq!(BaseCommand::from_frame(&frame), None);
    }

    #[test]
    fn test_zero_opcode_is_noop() {
        let frame = Frame::new(CLASS_BASE, 0x00, 0x00);
        assert_eq!(BaseCommand::from_frame(&frame), None);
        assert_eq!(ModuleCommand::from_byte(0x00), None);
    }

    #[test]
    fn test_module_opcodes() {
        assert_eq!(ModuleCommand::from_byte(0x01), Some(ModuleCommand::GetChanges));
        assert_eq!(ModuleCommand::from_byte(0x02), Some(ModuleCommand::ClearChanges));
        assert_eq!(ModuleCommand::from_byte(0x03), Some(ModuleCommand::ChannelCount));
        assert_eq!(ModuleCommand::from_byte(0xFF), None);
    }
}
