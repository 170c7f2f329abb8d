//! Programmer-visible register file.

use crate::Status;
use crate::flags::{I, U};

/// Base of the hardware stack; S indexes into this page.
const STACK_PAGE: u16 = 0x0100;

/// A, X, Y, S, PC and P.
///
/// S points at the next free byte in page one and wraps within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Stack pointer.
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Power-on state.
    ///
    /// A, X and Y are zero, S is $FD, PC is $0000 and only the interrupt
    /// disable flag is set. PC is not loaded from the reset vector; the
    /// host places it where the program starts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status(U | I),
        }
    }

    /// Claim the slot for a push and return its address.
    pub fn push(&mut self) -> u16 {
        let addr = STACK_PAGE | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Release the top slot and return its address.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        STACK_PAGE | u16::from(self.s)
    }
}
