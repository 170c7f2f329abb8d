//! Cycle-counting MOS 6502 interpreter.
//!
//! Each `step()` executes one whole instruction against a [`Bus`] and
//! returns the cycles it took, including page-crossing and branch
//! penalties. Only the 151 documented opcodes are decoded; anything else
//! is reported as [`CpuError::UnknownOpcode`].
//!
//! [`Bus`]: emu_core::Bus

mod addressing;
mod cpu;
mod error;
pub mod flags;
pub mod opcodes;
mod registers;

pub use cpu::Mos6502;
pub use error::CpuError;
pub use flags::Status;
pub use opcodes::{AddressingMode, Mnemonic, OPCODE_TABLE, Opcode, decode};
pub use registers::Registers;
