/*!
cpu_bus: the CPU's view of memory.

The CPU owns nothing but its registers. Every memory access goes through a
`CpuBus` borrowed for the duration of one `clock()`, `reset()`, `irq()` or
`nmi()` call. The real implementor is the Bus decode view; tests use a flat
64 KiB array.

Reads take `&mut self`: several CPU-visible registers (PPU status and data,
controller ports) have read side effects.
*/

/// Memory interface the CPU core depends on.
pub trait CpuBus {
    /// Read a byte from the CPU address space.
    fn cpu_read(&mut self, addr: u16) -> u8;

    /// Write a byte to the CPU address space.
    fn cpu_write(&mut self, addr: u16, data: u8);

    /// Read a little-endian word (no page wrap).
    fn cpu_read_word(&mut self, addr: u16) -> u16 {
        let lo = self.cpu_read(addr) as u16;
        let hi = self.cpu_read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

impl CpuBus for [u8; 0x10000] {
    #[inline]
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self[addr as usize]
    }

    #[inline]
    fn cpu_write(&mut self, addr: u16, data: u8) {
        self[addr as usize] = data;
    }
}
