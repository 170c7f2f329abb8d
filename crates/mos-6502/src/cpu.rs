//! 6502 CPU implementation.
//!
//! Instruction-stepped execution: each `step()` fetches one opcode,
//! resolves its operand, runs it to completion and returns the number of
//! clock cycles the instruction costs on real hardware.

use emu_core::{Bus, Cpu, Observable, Value};
use log::{trace, warn};

use crate::addressing::{Operand, Resolved};
use crate::error::CpuError;
use crate::flags::{B, C, D, I, N, V, Z};
use crate::opcodes::{self, Mnemonic, Opcode};
use crate::{Registers, Status};

/// BRK jumps through this vector.
const BRK_VECTOR: u16 = 0xFFFE;

/// The MOS 6502 CPU.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,

    /// Total cycles executed.
    total_cycles: u64,

    /// Total instructions executed.
    instructions: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! flag_accessors {
    ($($(#[$doc:meta])* $get:ident, $set:ident => $flag:expr;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub const fn $get(&self) -> bool {
                self.regs.p.is_set($flag)
            }

            pub fn $set(&mut self, value: bool) {
                self.regs.p.set_if($flag, value);
            }
        )*
    };
}

impl Mos6502 {
    /// Create a new 6502 in power-on state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            total_cycles: 0,
            instructions: 0,
        }
    }

    flag_accessors! {
        /// Carry flag.
        carry, set_carry => C;
        /// Zero flag.
        zero, set_zero => Z;
        /// Interrupt disable flag.
        interrupt_disable, set_interrupt_disable => I;
        /// Decimal mode flag.
        decimal_mode, set_decimal_mode => D;
        /// Break command flag.
        break_command, set_break_command => B;
        /// Overflow flag.
        overflow, set_overflow => V;
        /// Negative flag.
        negative, set_negative => N;
    }

    /// Cycles executed since creation.
    #[must_use]
    pub const fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Instructions executed since creation.
    #[must_use]
    pub const fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Fetch, decode and execute one instruction.
    fn execute_next<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        let address = self.regs.pc;
        let byte = self.fetch(bus);

        let Some(opcode) = opcodes::decode(byte) else {
            warn!("unknown opcode: ${byte:02X} at ${address:04X}");
            return Err(CpuError::UnknownOpcode {
                opcode: byte,
                address,
            });
        };

        let resolved = self.resolve(bus, opcode.mode);
        let mut cycles = u32::from(opcode.cycles);
        if resolved.page_crossed && opcode.mnemonic.has_page_penalty() {
            cycles += 1;
        }
        cycles += self.execute(bus, opcode, resolved);

        self.total_cycles += u64::from(cycles);
        self.instructions += 1;
        trace!(
            "${address:04X}: {} ({byte:02X}) {cycles} cycles, A={:02X} X={:02X} Y={:02X} S={:02X} P={:02X}",
            opcode.mnemonic,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.s,
            self.regs.p.0
        );

        Ok(cycles)
    }

    /// Run a decoded instruction. Returns cycles spent beyond the base
    /// count, which only taken branches incur.
    fn execute<B: Bus>(&mut self, bus: &mut B, opcode: Opcode, resolved: Resolved) -> u32 {
        let operand = resolved.operand;
        match opcode.mnemonic {
            // Loads and stores
            Mnemonic::Lda => self.read_op(bus, operand, Self::do_lda),
            Mnemonic::Ldx => self.read_op(bus, operand, Self::do_ldx),
            Mnemonic::Ldy => self.read_op(bus, operand, Self::do_ldy),
            Mnemonic::Sta => self.store(bus, operand, self.regs.a),
            Mnemonic::Stx => self.store(bus, operand, self.regs.x),
            Mnemonic::Sty => self.store(bus, operand, self.regs.y),

            // Logic and arithmetic
            Mnemonic::And => self.read_op(bus, operand, Self::do_and),
            Mnemonic::Ora => self.read_op(bus, operand, Self::do_ora),
            Mnemonic::Eor => self.read_op(bus, operand, Self::do_eor),
            Mnemonic::Bit => self.read_op(bus, operand, Self::do_bit),
            Mnemonic::Adc => self.read_op(bus, operand, Self::do_adc),
            Mnemonic::Sbc => self.read_op(bus, operand, Self::do_sbc),
            Mnemonic::Cmp => self.read_op(bus, operand, Self::do_cmp),
            Mnemonic::Cpx => self.read_op(bus, operand, Self::do_cpx),
            Mnemonic::Cpy => self.read_op(bus, operand, Self::do_cpy),

            // Read-modify-write
            Mnemonic::Asl => self.modify(bus, operand, Self::do_asl),
            Mnemonic::Lsr => self.modify(bus, operand, Self::do_lsr),
            Mnemonic::Rol => self.modify(bus, operand, Self::do_rol),
            Mnemonic::Ror => self.modify(bus, operand, Self::do_ror),
            Mnemonic::Inc => self.modify(bus, operand, Self::do_inc),
            Mnemonic::Dec => self.modify(bus, operand, Self::do_dec),

            // Register increments
            Mnemonic::Inx => {
                self.regs.x = self.do_inc(self.regs.x);
            }
            Mnemonic::Iny => {
                self.regs.y = self.do_inc(self.regs.y);
            }
            Mnemonic::Dex => {
                self.regs.x = self.do_dec(self.regs.x);
            }
            Mnemonic::Dey => {
                self.regs.y = self.do_dec(self.regs.y);
            }

            // Transfers
            Mnemonic::Tax => self.do_ldx(self.regs.a),
            Mnemonic::Tay => self.do_ldy(self.regs.a),
            Mnemonic::Txa => self.do_lda(self.regs.x),
            Mnemonic::Tya => self.do_lda(self.regs.y),
            Mnemonic::Tsx => self.do_ldx(self.regs.s),
            // TXS does not affect flags
            Mnemonic::Txs => self.regs.s = self.regs.x,

            // Stack
            Mnemonic::Pha => self.push(bus, self.regs.a),
            Mnemonic::Php => self.push(bus, self.regs.p.to_byte_brk()),
            Mnemonic::Pla => {
                let value = self.pull(bus);
                self.do_lda(value);
            }
            Mnemonic::Plp => {
                let value = self.pull(bus);
                self.restore_status(value);
            }

            // Jumps and calls
            Mnemonic::Jmp => self.regs.pc = Self::address(operand),
            Mnemonic::Jsr => {
                let target = Self::address(operand);
                self.push_word(bus, self.regs.pc.wrapping_sub(1));
                self.regs.pc = target;
            }
            Mnemonic::Rts => {
                self.regs.pc = self.pull_word(bus).wrapping_add(1);
            }
            Mnemonic::Rti => {
                let value = self.pull(bus);
                self.restore_status(value);
                self.regs.pc = self.pull_word(bus);
            }
            Mnemonic::Brk => self.op_brk(bus),

            // Branches
            Mnemonic::Bpl => return self.branch(resolved, !self.regs.p.is_set(N)),
            Mnemonic::Bmi => return self.branch(resolved, self.regs.p.is_set(N)),
            Mnemonic::Bvc => return self.branch(resolved, !self.regs.p.is_set(V)),
            Mnemonic::Bvs => return self.branch(resolved, self.regs.p.is_set(V)),
            Mnemonic::Bcc => return self.branch(resolved, !self.regs.p.is_set(C)),
            Mnemonic::Bcs => return self.branch(resolved, self.regs.p.is_set(C)),
            Mnemonic::Bne => return self.branch(resolved, !self.regs.p.is_set(Z)),
            Mnemonic::Beq => return self.branch(resolved, self.regs.p.is_set(Z)),

            // Flags
            Mnemonic::Clc => self.regs.p.clear(C),
            Mnemonic::Sec => self.regs.p.set(C),
            Mnemonic::Cli => self.regs.p.clear(I),
            Mnemonic::Sei => self.regs.p.set(I),
            Mnemonic::Cld => self.regs.p.clear(D),
            Mnemonic::Sed => self.regs.p.set(D),
            Mnemonic::Clv => self.regs.p.clear(V),

            Mnemonic::Nop => {}
        }
        0
    }

    // ========================================================================
    // Operand access
    // ========================================================================

    fn load<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Memory(addr) => bus.read(addr),
            Operand::Accumulator => self.regs.a,
            Operand::Implied | Operand::Branch(_) => unreachable!("{operand:?} has no value"),
        }
    }

    fn store<B: Bus>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::Memory(addr) => bus.write(addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::Implied | Operand::Immediate(_) | Operand::Branch(_) => {
                unreachable!("cannot store to {operand:?}")
            }
        }
    }

    fn address(operand: Operand) -> u16 {
        match operand {
            Operand::Memory(addr) | Operand::Branch(addr) => addr,
            _ => unreachable!("{operand:?} has no address"),
        }
    }

    fn read_op<B: Bus>(&mut self, bus: &mut B, operand: Operand, op: fn(&mut Self, u8)) {
        let value = self.load(bus, operand);
        op(self, value);
    }

    /// Read, transform and write back. Flags come from the written value.
    fn modify<B: Bus>(&mut self, bus: &mut B, operand: Operand, op: fn(&mut Self, u8) -> u8) {
        let value = self.load(bus, operand);
        let result = op(self, value);
        self.store(bus, operand, result);
    }

    /// Take the branch if `taken`. Returns the extra cycles: one for a
    /// taken branch, one more if the target is on another page.
    fn branch(&mut self, resolved: Resolved, taken: bool) -> u32 {
        if !taken {
            return 0;
        }
        self.regs.pc = Self::address(resolved.operand);
        if resolved.page_crossed { 2 } else { 1 }
    }

    /// PLP and RTI load every flag except B, which keeps its value.
    fn restore_status(&mut self, value: u8) {
        let brk = self.regs.p.is_set(B);
        self.regs.p = Status::from_byte(value);
        self.regs.p.set_if(B, brk);
    }

    fn op_brk<B: Bus>(&mut self, bus: &mut B) {
        // Padding byte is skipped
        let return_addr = self.regs.pc.wrapping_add(1);
        self.push_word(bus, return_addr);
        self.push(bus, self.regs.p.to_byte_brk());
        self.regs.p.set(I);
        self.regs.p.set(B);
        self.regs.pc = bus.read_word(BRK_VECTOR);
    }

    // ========================================================================
    // ALU operations
    // ========================================================================

    fn do_lda(&mut self, val: u8) {
        self.regs.a = val;
        self.regs.p.update_nz(val);
    }

    fn do_ldx(&mut self, val: u8) {
        self.regs.x = val;
        self.regs.p.update_nz(val);
    }

    fn do_ldy(&mut self, val: u8) {
        self.regs.y = val;
        self.regs.p.update_nz(val);
    }

    fn do_ora(&mut self, val: u8) {
        self.regs.a |= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_and(&mut self, val: u8) {
        self.regs.a &= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_eor(&mut self, val: u8) {
        self.regs.a ^= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_adc(&mut self, val: u8) {
        if self.regs.p.is_set(D) {
            self.do_adc_decimal(val);
        } else {
            self.do_adc_binary(val);
        }
    }

    fn do_adc_binary(&mut self, val: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(val) + carry;
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (a ^ result) & (val ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    fn do_adc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));

        // Low nibble
        let mut lo = u16::from(a & 0x0F) + u16::from(val & 0x0F) + carry;
        if lo > 9 {
            lo += 6;
        }

        // High nibble picks up the half carry
        let mut hi = u16::from(a >> 4) + u16::from(val >> 4) + u16::from(lo > 0x0F);

        // V is judged on the sum before the high nibble is corrected
        let intermediate = ((hi << 4) | (lo & 0x0F)) as u8;
        self.regs
            .p
            .set_if(V, !(a ^ val) & (a ^ intermediate) & 0x80 != 0);

        if hi > 9 {
            hi += 6;
        }

        self.regs.p.set_if(C, hi > 0x0F);
        self.regs.a = ((hi << 4) | (lo & 0x0F)) as u8;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_sbc(&mut self, val: u8) {
        if self.regs.p.is_set(D) {
            self.do_sbc_decimal(val);
        } else {
            // SBC is ADC with inverted operand
            self.do_adc_binary(!val);
        }
    }

    fn do_sbc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let borrow = i16::from(!self.regs.p.is_set(C));

        // Binary result for flags (NMOS behavior)
        let bin_result = i16::from(a) - i16::from(val) - borrow;
        self.regs.p.set_if(C, bin_result >= 0);
        self.regs.p.set_if(Z, (bin_result as u8) == 0);
        self.regs.p.set_if(N, bin_result & 0x80 != 0);
        self.regs.p.set_if(
            V,
            (i16::from(a) ^ bin_result) & (i16::from(a) ^ i16::from(val)) & 0x80 != 0,
        );

        // Decimal calculation
        let mut lo = i16::from(a & 0x0F) - i16::from(val & 0x0F) - borrow;
        let mut hi = i16::from(a >> 4) - i16::from(val >> 4);

        if lo < 0 {
            lo -= 6;
            hi -= 1;
        }
        if hi < 0 {
            hi -= 6;
        }

        self.regs.a = ((hi << 4) as u8) | ((lo & 0x0F) as u8);
    }

    fn compare(&mut self, reg: u8, val: u8) {
        self.regs.p.set_if(C, reg >= val);
        self.regs.p.update_nz(reg.wrapping_sub(val));
    }

    fn do_cmp(&mut self, val: u8) {
        self.compare(self.regs.a, val);
    }

    fn do_cpx(&mut self, val: u8) {
        self.compare(self.regs.x, val);
    }

    fn do_cpy(&mut self, val: u8) {
        self.compare(self.regs.y, val);
    }

    fn do_bit(&mut self, val: u8) {
        self.regs.p.set_if(Z, self.regs.a & val == 0);
        self.regs.p.set_if(N, val & 0x80 != 0);
        self.regs.p.set_if(V, val & 0x40 != 0);
    }

    fn do_asl(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = val << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = val >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, val: u8) -> u8 {
        let carry = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = (val << 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, val: u8) -> u8 {
        let carry = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = (val >> 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl Cpu for Mos6502 {
    type Registers = Registers;
    type Error = CpuError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        self.execute_next(bus)
    }

    /// Sets the interrupt disable flag and nothing else. Registers, SP and
    /// PC keep their values; PC is not loaded from the reset vector.
    fn reset(&mut self) {
        self.regs.p.set(I);
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" | "c" => Some(self.carry().into()),
            "flags.z" | "z" => Some(self.zero().into()),
            "flags.i" | "i" => Some(self.interrupt_disable().into()),
            "flags.d" | "d" => Some(self.decimal_mode().into()),
            "flags.b" | "b" => Some(self.break_command().into()),
            "flags.v" | "v" => Some(self.overflow().into()),
            "flags.n" | "n" => Some(self.negative().into()),
            "cycles" => Some(self.total_cycles.into()),
            "instructions" => Some(self.instructions.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.b",
            "flags.v",
            "flags.n",
            "cycles",
            "instructions",
        ]
    }
}
