//! Module identity: the friend code
//!
//! A friend code is the stable identity the controller enumerates modules
//! by: one module-type byte followed by the 10-byte hardware-unique serial.
//! It is generated once at startup and never changes afterwards - in
//! particular it survives address swaps, which is what lets the controller
//! recognize a module it has already configured.

/// Length of the unique serial part in bytes
pub const SERIAL_LEN: usize = 10;

/// Length of the full friend code in bytes
pub const FRIEND_CODE_LEN: usize = 1 + SERIAL_LEN;

/// Module kind tag, the first friend-code byte
///
/// Doubles as the command class a module of that kind answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleType {
    /// Rotary encoder module
    Knobs,
    /// Analog slider module
    Sliders,
}

impl ModuleType {
    /// Parse a module type from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ModuleType::Knobs),
            0x02 => Some(ModuleType::Sliders),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            ModuleType::Knobs => 0x01,
            ModuleType::Sliders => 0x02,
        }
    }
}

/// The 11-byte module identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FriendCode {
    bytes: [u8; FRIEND_CODE_LEN],
}

impl FriendCode {
    /// Build a friend code from the module type and unique serial
    pub fn new(module_type: ModuleType, serial: [u8; SERIAL_LEN]) -> Self {
        let mut bytes = [0u8; FRIEND_CODE_LEN];
        bytes[0] = module_type.to_byte();
        bytes[1..].copy_from_slice(&serial);
        Self { bytes }
    }

    /// The full wire image, emitted verbatim on readback
    pub fn as_bytes(&self) -> &[u8; FRIEND_CODE_LEN] {
        &self.bytes
    }

    /// The module type tag
    pub fn module_type(&self) -> Option<ModuleType> {
        ModuleType::from_byte(self.bytes[0])
    }

    /// The unique serial part
    pub fn serial(&self) -> &[u8] {
        &self.bytes[1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_type_roundtrip() {
        for ty in [ModuleType::Knobs, ModuleType::Sliders] {
            assert_eq!(ModuleType::from_byte(ty.to_byte()), Some(ty));
        }
        assert_eq!(ModuleType::from_byte(0x00), None);
        assert_eq!(ModuleType::from_byte(0xFF), None);
    }

    #[test]
    fn test_friend_code_layout() {
        let serial = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let code = FriendCode::new(ModuleType::Knobs, serial);

        assert_eq!(code.as_bytes().len(), FRIEND_CODE_LEN);
        assert_eq!(code.as_bytes()[0], 0x01);
        assert_eq!(code.serial(), &serial);
    }

    #[test]
    fn test_friend_code_is_stable() {
        let serial = [0xAA; SERIAL_LEN];
        let a = FriendCode::new(ModuleType::Sliders, serial);
        let b = FriendCode::new(ModuleType::Sliders, serial);
        assert_eq!(a, b);
        assert_eq!(a.module_type(), Some(ModuleType::Sliders));
    }
}
