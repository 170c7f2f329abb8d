//! CPU faults.

use std::fmt;

/// A condition that stops an instruction from executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The byte at `address` is not an official 6502 opcode.
    ///
    /// PC has already moved one byte past `address`; no operand bytes were
    /// consumed and no cycles were spent.
    UnknownOpcode { opcode: u8, address: u16 },
}

impl CpuError {
    /// Cycles consumed by the faulting step.
    #[must_use]
    pub const fn cycles(&self) -> u32 {
        match self {
            Self::UnknownOpcode { .. } => 0,
        }
    }
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode ${opcode:02X} at ${address:04X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}
