//! CPU core trait.

use crate::Bus;

/// A CPU core that executes whole instructions.
///
/// The bus is passed in, not owned, so the host keeps control of memory
/// between steps and can inspect or reload it freely.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Fault reported when an instruction cannot be executed.
    type Error;

    /// Execute one instruction. Returns the cycles it consumed.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Self::Error>;

    /// Apply the CPU's reset behaviour.
    fn reset(&mut self);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;
}
