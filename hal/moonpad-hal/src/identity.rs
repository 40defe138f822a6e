//! Hardware-unique serial number source
//!
//! Every module chip carries a factory-programmed serial in an immutable
//! identity store (SIGROW, flash UID, ...). The friend code embeds it so a
//! module keeps the same identity across address swaps and power cycles.

/// Length of the hardware-unique serial in bytes
pub const UNIQUE_SERIAL_LEN: usize = 10;

/// Read-only source of the hardware-unique serial
///
/// The identity store is always readable, so this trait has no failure
/// path. Implementations that have fewer than [`UNIQUE_SERIAL_LEN`] bytes
/// of hardware identity zero-pad the tail.
pub trait SerialSource {
    /// Read the unique serial
    fn unique_serial(&self) -> [u8; UNIQUE_SERIAL_LEN];
}
