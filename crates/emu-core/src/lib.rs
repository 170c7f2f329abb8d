//! Core traits and types for instruction-stepped emulation.
//!
//! CPUs execute one whole instruction per `step()` and report how many
//! clock cycles it cost. Memory is reached only through the [`Bus`] trait,
//! which the CPU borrows for the duration of each step.

mod bus;
mod cpu;
mod memory;
mod observable;

pub use bus::Bus;
pub use cpu::Cpu;
pub use memory::{AddressSpace, MEMORY_SIZE};
pub use observable::{Observable, Value};
