//! Opcode dispatch table.
//!
//! Every official NMOS opcode maps to a mnemonic, an addressing mode and a
//! base cycle count. Bytes with no entry are unofficial opcodes, which the
//! CPU reports as faults instead of executing.

use std::fmt;

/// The 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand (CLC, RTS).
    Implied,
    /// Operates on A (ASL A).
    Accumulator,
    /// `#$nn` - the operand byte is the value.
    Immediate,
    /// `$nn` - 8-bit address in page zero.
    ZeroPage,
    /// `$nn,X` - wraps within page zero.
    ZeroPageX,
    /// `$nn,Y` - wraps within page zero.
    ZeroPageY,
    /// `$nnnn`.
    Absolute,
    /// `$nnnn,X` - may cross a page.
    AbsoluteX,
    /// `$nnnn,Y` - may cross a page.
    AbsoluteY,
    /// `($nnnn)` - JMP only, pointer high byte wraps within its page.
    Indirect,
    /// `($nn,X)` - zero page pointer indexed by X.
    IndexedIndirect,
    /// `($nn),Y` - zero page pointer, then Y added to the target.
    IndirectIndexed,
    /// Signed branch displacement.
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndexedIndirect
            | Self::IndirectIndexed
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

/// Official 6502 instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Mnemonic {
    /// Read-class instructions take one extra cycle when indexing crosses
    /// a page. Stores and read-modify-write instructions always pay it, so
    /// it is part of their base count instead.
    #[must_use]
    pub const fn has_page_penalty(self) -> bool {
        matches!(
            self,
            Self::Adc
                | Self::And
                | Self::Cmp
                | Self::Eor
                | Self::Lda
                | Self::Ldx
                | Self::Ldy
                | Self::Ora
                | Self::Sbc
        )
    }

    /// Assembler name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// The opcode byte.
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Base cycle cost, before page-crossing and branch penalties.
    pub cycles: u8,
}

impl Opcode {
    /// Instruction length in bytes, opcode included.
    #[must_use]
    pub const fn size_bytes(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

const fn op(code: u8, mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> Opcode {
    Opcode {
        code,
        mnemonic,
        mode,
        cycles,
    }
}

use AddressingMode::{
    Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
    Implied as Imp, IndexedIndirect as Izx, Indirect as Ind, IndirectIndexed as Izy,
    Relative as Rel, ZeroPage as Zp, ZeroPageX as Zpx, ZeroPageY as Zpy,
};
use Mnemonic::{
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp, Cpx,
    Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla,
    Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
};

/// The 151 official opcodes.
#[rustfmt::skip]
const OFFICIAL: [Opcode; 151] = [
    // Loads
    op(0xA9, Lda, Imm, 2), op(0xA5, Lda, Zp, 3), op(0xB5, Lda, Zpx, 4), op(0xAD, Lda, Abs, 4),
    op(0xBD, Lda, Abx, 4), op(0xB9, Lda, Aby, 4), op(0xA1, Lda, Izx, 6), op(0xB1, Lda, Izy, 5),
    op(0xA2, Ldx, Imm, 2), op(0xA6, Ldx, Zp, 3), op(0xB6, Ldx, Zpy, 4), op(0xAE, Ldx, Abs, 4),
    op(0xBE, Ldx, Aby, 4),
    op(0xA0, Ldy, Imm, 2), op(0xA4, Ldy, Zp, 3), op(0xB4, Ldy, Zpx, 4), op(0xAC, Ldy, Abs, 4),
    op(0xBC, Ldy, Abx, 4),
    // Stores
    op(0x85, Sta, Zp, 3), op(0x95, Sta, Zpx, 4), op(0x8D, Sta, Abs, 4), op(0x9D, Sta, Abx, 5),
    op(0x99, Sta, Aby, 5), op(0x81, Sta, Izx, 6), op(0x91, Sta, Izy, 6),
    op(0x86, Stx, Zp, 3), op(0x96, Stx, Zpy, 4), op(0x8E, Stx, Abs, 4),
    op(0x84, Sty, Zp, 3), op(0x94, Sty, Zpx, 4), op(0x8C, Sty, Abs, 4),
    // Transfers
    op(0xAA, Tax, Imp, 2), op(0xA8, Tay, Imp, 2), op(0x8A, Txa, Imp, 2), op(0x98, Tya, Imp, 2),
    op(0xBA, Tsx, Imp, 2), op(0x9A, Txs, Imp, 2),
    // Stack
    op(0x48, Pha, Imp, 3), op(0x08, Php, Imp, 3), op(0x68, Pla, Imp, 4), op(0x28, Plp, Imp, 4),
    // Logic
    op(0x29, And, Imm, 2), op(0x25, And, Zp, 3), op(0x35, And, Zpx, 4), op(0x2D, And, Abs, 4),
    op(0x3D, And, Abx, 4), op(0x39, And, Aby, 4), op(0x21, And, Izx, 6), op(0x31, And, Izy, 5),
    op(0x09, Ora, Imm, 2), op(0x05, Ora, Zp, 3), op(0x15, Ora, Zpx, 4), op(0x0D, Ora, Abs, 4),
    op(0x1D, Ora, Abx, 4), op(0x19, Ora, Aby, 4), op(0x01, Ora, Izx, 6), op(0x11, Ora, Izy, 5),
    op(0x49, Eor, Imm, 2), op(0x45, Eor, Zp, 3), op(0x55, Eor, Zpx, 4), op(0x4D, Eor, Abs, 4),
    op(0x5D, Eor, Abx, 4), op(0x59, Eor, Aby, 4), op(0x41, Eor, Izx, 6), op(0x51, Eor, Izy, 5),
    op(0x24, Bit, Zp, 3), op(0x2C, Bit, Abs, 4),
    // Arithmetic
    op(0x69, Adc, Imm, 2), op(0x65, Adc, Zp, 3), op(0x75, Adc, Zpx, 4), op(0x6D, Adc, Abs, 4),
    op(0x7D, Adc, Abx, 4), op(0x79, Adc, Aby, 4), op(0x61, Adc, Izx, 6), op(0x71, Adc, Izy, 5),
    op(0xE9, Sbc, Imm, 2), op(0xE5, Sbc, Zp, 3), op(0xF5, Sbc, Zpx, 4), op(0xED, Sbc, Abs, 4),
    op(0xFD, Sbc, Abx, 4), op(0xF9, Sbc, Aby, 4), op(0xE1, Sbc, Izx, 6), op(0xF1, Sbc, Izy, 5),
    op(0xC9, Cmp, Imm, 2), op(0xC5, Cmp, Zp, 3), op(0xD5, Cmp, Zpx, 4), op(0xCD, Cmp, Abs, 4),
    op(0xDD, Cmp, Abx, 4), op(0xD9, Cmp, Aby, 4), op(0xC1, Cmp, Izx, 6), op(0xD1, Cmp, Izy, 5),
    op(0xE0, Cpx, Imm, 2), op(0xE4, Cpx, Zp, 3), op(0xEC, Cpx, Abs, 4),
    op(0xC0, Cpy, Imm, 2), op(0xC4, Cpy, Zp, 3), op(0xCC, Cpy, Abs, 4),
    // Increments and decrements
    op(0xE6, Inc, Zp, 5), op(0xF6, Inc, Zpx, 6), op(0xEE, Inc, Abs, 6), op(0xFE, Inc, Abx, 7),
    op(0xC6, Dec, Zp, 5), op(0xD6, Dec, Zpx, 6), op(0xCE, Dec, Abs, 6), op(0xDE, Dec, Abx, 7),
    op(0xE8, Inx, Imp, 2), op(0xC8, Iny, Imp, 2), op(0xCA, Dex, Imp, 2), op(0x88, Dey, Imp, 2),
    // Shifts
    op(0x0A, Asl, Acc, 2), op(0x06, Asl, Zp, 5), op(0x16, Asl, Zpx, 6), op(0x0E, Asl, Abs, 6),
    op(0x1E, Asl, Abx, 7),
    op(0x4A, Lsr, Acc, 2), op(0x46, Lsr, Zp, 5), op(0x56, Lsr, Zpx, 6), op(0x4E, Lsr, Abs, 6),
    op(0x5E, Lsr, Abx, 7),
    op(0x2A, Rol, Acc, 2), op(0x26, Rol, Zp, 5), op(0x36, Rol, Zpx, 6), op(0x2E, Rol, Abs, 6),
    op(0x3E, Rol, Abx, 7),
    op(0x6A, Ror, Acc, 2), op(0x66, Ror, Zp, 5), op(0x76, Ror, Zpx, 6), op(0x6E, Ror, Abs, 6),
    op(0x7E, Ror, Abx, 7),
    // Jumps and calls
    op(0x4C, Jmp, Abs, 3), op(0x6C, Jmp, Ind, 5), op(0x20, Jsr, Abs, 6), op(0x60, Rts, Imp, 6),
    op(0x40, Rti, Imp, 6), op(0x00, Brk, Imp, 7),
    // Branches
    op(0x10, Bpl, Rel, 2), op(0x30, Bmi, Rel, 2), op(0x50, Bvc, Rel, 2), op(0x70, Bvs, Rel, 2),
    op(0x90, Bcc, Rel, 2), op(0xB0, Bcs, Rel, 2), op(0xD0, Bne, Rel, 2), op(0xF0, Beq, Rel, 2),
    // Flags
    op(0x18, Clc, Imp, 2), op(0x38, Sec, Imp, 2), op(0x58, Cli, Imp, 2), op(0x78, Sei, Imp, 2),
    op(0xD8, Cld, Imp, 2), op(0xF8, Sed, Imp, 2), op(0xB8, Clv, Imp, 2),
    op(0xEA, Nop, Imp, 2),
];

const fn build_table() -> [Option<Opcode>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < OFFICIAL.len() {
        let entry = OFFICIAL[i];
        table[entry.code as usize] = Some(entry);
        i += 1;
    }
    table
}

/// Opcode table indexed by opcode byte.
pub static OPCODE_TABLE: [Option<Opcode>; 256] = build_table();

/// Look up an opcode byte. Returns `None` for unofficial opcodes.
#[must_use]
pub fn decode(byte: u8) -> Option<Opcode> {
    OPCODE_TABLE[usize::from(byte)]
}
