//! Memory bus interface.

/// Memory bus interface.
///
/// Components access memory through this trait. Every address in the
/// 16-bit space is valid: reads and writes are total functions.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a little-endian word. The high byte comes from `address + 1`,
    /// wrapping at the top of the address space.
    fn read_word(&mut self, address: u16) -> u16 {
        let low = self.read(address);
        let high = self.read(address.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Write a little-endian word, low byte first.
    fn write_word(&mut self, address: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write(address, low);
        self.write(address.wrapping_add(1), high);
    }
}
