//! Base command dispatcher
//!
//! The dispatcher sits directly behind the bus peripheral's callback pair.
//! Every inbound frame lands here first: base-class commands (identity
//! readback, address swap) are consumed in place, everything else goes to
//! the active module handler.
//!
//! The dispatcher is pure logic so the whole command surface runs in host
//! tests. Side effects on the bus session itself (closing and reopening at
//! a new address, re-registering the callbacks) are returned as a
//! [`SessionChange`] that the session loop applies before it accepts the
//! next frame - the hardware acknowledged the triggering frame long before
//! this code ran, so the swap takes effect strictly after the current
//! transaction.

use moonpad_hal::SerialSource;
use moonpad_protocol::command::CLASS_BASE;
use moonpad_protocol::{BaseCommand, BusAddress, Frame, FriendCode, ModuleType, Reply};

use crate::module::ModuleHandler;

/// Bus-session side effect requested by a base command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum SessionChange {
    /// Close the session and reopen it bound to this address, with both
    /// callbacks re-registered. Rebinding to the current address is
    /// legal and rebinds all the same.
    Rebind(BusAddress),
}

/// Per-module command dispatcher
///
/// Owns the friend code (generated exactly once, at construction, before
/// the bus is opened), the current bus address, the latest inbound frame
/// (single slot, overwrite-latest) and the module handler.
pub struct Dispatcher<H: ModuleHandler> {
    address: BusAddress,
    friend_code: FriendCode,
    frame: Frame,
    handler: H,
}

impl<H: ModuleHandler> Dispatcher<H> {
    /// Create a dispatcher on the default bus address
    pub fn new(module_type: ModuleType, serial: &impl SerialSource, handler: H) -> Self {
        Self {
            address: BusAddress::DEFAULT,
            friend_code: FriendCode::new(module_type, serial.unique_serial()),
            frame: Frame::empty(),
            handler,
        }
    }

    /// The address the session is currently bound to
    pub fn address(&self) -> BusAddress {
        self.address
    }

    /// The module's friend code
    pub fn friend_code(&self) -> &FriendCode {
        &self.friend_code
    }

    /// The module handler (sensor producers feed it through this)
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Inbound frame callback
    ///
    /// Loads the frame slot, then either consumes a base command or
    /// forwards to the handler. Never both: when the base class matched,
    /// module code does not see the frame.
    pub fn on_receive(&mut self, data: &[u8]) -> Option<SessionChange> {
        self.frame = Frame::from_bytes(data);

        if self.frame.class() == CLASS_BASE {
            if let Some(BaseCommand::SwapAddress(address)) = BaseCommand::from_frame(&self.frame) {
                self.address = address;
                return Some(SessionChange::Rebind(address));
            }
            // Friend-code readback acts on the next bus read; any other
            // base opcode is a no-op
            return None;
        }

        self.handler.on_receive(&self.frame);
        None
    }

    /// Outbound request callback
    ///
    /// Interprets the retained frame and returns the reply bytes, if the
    /// command has any.
    pub fn on_request(&mut self) -> Option<Reply> {
        if self.frame.class() == CLASS_BASE {
            return match BaseCommand::from_frame(&self.frame)? {
                BaseCommand::FriendCode => {
                    let mut reply = Reply::new();
                    // Cannot fail, a reply holds a friend code
                    let _ = reply.extend_from_slice(self.friend_code.as_bytes());
                    Some(reply)
                }
                // The swap already happened on receive
                BaseCommand::SwapAddress(_) => None,
            };
        }

        self.handler.on_request(&self.frame)
    }
}
