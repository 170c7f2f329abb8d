//! 6502 processor status register (P).
//!
//! The status register contains flags that reflect the result of operations
//! and control CPU behavior.

/// Carry flag - set if operation resulted in carry, clear on borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ interrupts are ignored.
pub const I: u8 = 0x04;

/// Decimal mode - enables BCD arithmetic for ADC/SBC.
pub const D: u8 = 0x08;

/// Break command - set once a BRK instruction has executed.
pub const B: u8 = 0x10;

/// Unused bit - always reads as 1.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Create a new status register with the unused bit set.
    #[must_use]
    pub const fn new() -> Self {
        Self(U)
    }

    /// Create status from raw value, ensuring unused bit is set.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value | U)
    }

    /// Raw value with the unused bit set.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.0 | U
    }

    /// Raw value as pushed by BRK/PHP (break and unused both set).
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z flags based on a value.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_nz_tracks_value() {
        let mut p = Status::new();
        p.update_nz(0x00);
        assert!(p.is_set(Z));
        assert!(!p.is_set(N));

        p.update_nz(0x80);
        assert!(!p.is_set(Z));
        assert!(p.is_set(N));
    }

    #[test]
    fn set_if_touches_only_one_bit() {
        let mut p = Status::from_byte(C | V);
        p.set_if(D, true);
        assert_eq!(p.0, C | V | D | U);
        p.set_if(C, false);
        assert_eq!(p.0, V | D | U);
    }

    #[test]
    fn pushed_byte_has_break_and_unused() {
        assert_eq!(Status::from_byte(C).to_byte_brk(), C | B | U);
        assert_eq!(Status(0).to_byte(), U);
    }
}
