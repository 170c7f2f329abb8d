//! Operand fetch and effective-address resolution.
//!
//! Every mode consumes its operand bytes from PC up front, so by the time
//! an instruction executes PC already points at the next opcode.

use emu_core::Bus;

use crate::Mos6502;
use crate::opcodes::AddressingMode;

/// Where an instruction's operand lives once its mode has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// No operand.
    Implied,
    /// The accumulator.
    Accumulator,
    /// A literal value.
    Immediate(u8),
    /// An effective address in memory.
    Memory(u16),
    /// Branch target, computed from the PC after the instruction.
    Branch(u16),
}

/// A resolved operand plus whether indexing or branching crossed a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    const fn new(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }

    const fn indexed(base: u16, addr: u16) -> Self {
        Self {
            operand: Operand::Memory(addr),
            page_crossed: base & 0xFF00 != addr & 0xFF00,
        }
    }
}

impl Mos6502 {
    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit little-endian word at PC.
    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Read a pointer from zero page. The high byte wraps within page zero,
    /// so a pointer at $FF takes its high byte from $00.
    fn read_zero_page_word<B: Bus>(bus: &mut B, pointer: u8) -> u16 {
        let low = bus.read(u16::from(pointer));
        let high = bus.read(u16::from(pointer.wrapping_add(1)));
        u16::from_le_bytes([low, high])
    }

    /// Read a word with the 6502 indirect JMP bug: if `addr` is $xxFF the
    /// high byte comes from $xx00.
    fn read_word_page_bug<B: Bus>(bus: &mut B, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = bus.read(high_addr);
        u16::from_le_bytes([low, high])
    }

    /// Consume the operand bytes for `mode` and work out what they refer to.
    pub(crate) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: AddressingMode) -> Resolved {
        match mode {
            AddressingMode::Implied => Resolved::new(Operand::Implied),
            AddressingMode::Accumulator => Resolved::new(Operand::Accumulator),
            AddressingMode::Immediate => Resolved::new(Operand::Immediate(self.fetch(bus))),
            AddressingMode::ZeroPage => Resolved::new(Operand::Memory(u16::from(self.fetch(bus)))),
            AddressingMode::ZeroPageX => {
                let base = self.fetch(bus);
                Resolved::new(Operand::Memory(u16::from(base.wrapping_add(self.regs.x))))
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch(bus);
                Resolved::new(Operand::Memory(u16::from(base.wrapping_add(self.regs.y))))
            }
            AddressingMode::Absolute => Resolved::new(Operand::Memory(self.fetch_word(bus))),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                Resolved::indexed(base, base.wrapping_add(u16::from(self.regs.x)))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                Resolved::indexed(base, base.wrapping_add(u16::from(self.regs.y)))
            }
            AddressingMode::Indirect => {
                let pointer = self.fetch_word(bus);
                Resolved::new(Operand::Memory(Self::read_word_page_bug(bus, pointer)))
            }
            AddressingMode::IndexedIndirect => {
                let pointer = self.fetch(bus).wrapping_add(self.regs.x);
                Resolved::new(Operand::Memory(Self::read_zero_page_word(bus, pointer)))
            }
            AddressingMode::IndirectIndexed => {
                let pointer = self.fetch(bus);
                let base = Self::read_zero_page_word(bus, pointer);
                Resolved::indexed(base, base.wrapping_add(u16::from(self.regs.y)))
            }
            AddressingMode::Relative => {
                let offset = self.fetch(bus) as i8;
                let next = self.regs.pc;
                let target = next.wrapping_add_signed(i16::from(offset));
                Resolved {
                    operand: Operand::Branch(target),
                    page_crossed: next & 0xFF00 != target & 0xFF00,
                }
            }
        }
    }

    /// Push a byte onto the stack.
    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    /// Pull a byte from the stack.
    pub(crate) fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    /// Push a 16-bit word onto the stack (high byte first).
    pub(crate) fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push(bus, high);
        self.push(bus, low);
    }

    /// Pull a 16-bit word from the stack (low byte first).
    pub(crate) fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.pull(bus);
        let high = self.pull(bus);
        u16::from_le_bytes([low, high])
    }
}
