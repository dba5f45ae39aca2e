/*!
ppu_bus: Trait abstraction decoupling the PPU from whatever owns the
cartridge.

The PPU keeps nametables, palette RAM and its fallback pattern tables itself.
The only thing it needs from the outside world is:
- first refusal on pattern-space ($0000-$1FFF) reads and writes, and
- the nametable mirroring arrangement.

Accepting a trait keeps the PPU testable without a Bus (see
`test_utils::MockPpuBus`) and lets the Bus hand over nothing more than a
borrow of its cartridge slot.
*/

use crate::cartridge::{Cartridge, Mirroring};

/// Cartridge-side view of the PPU address space.
pub trait PpuBus {
    /// Pattern-space read. `None` means the address was not claimed and the
    /// PPU should fall back to its own storage.
    fn ppu_read(&self, addr: u16) -> Option<u8>;

    /// Pattern-space write. Returns `true` if the write was claimed.
    fn ppu_write(&mut self, addr: u16, data: u8) -> bool;

    /// Nametable arrangement selected by the cartridge.
    fn mirroring(&self) -> Mirroring;
}

impl PpuBus for Cartridge {
    #[inline]
    fn ppu_read(&self, addr: u16) -> Option<u8> {
        Cartridge::ppu_read(self, addr)
    }

    #[inline]
    fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        Cartridge::ppu_write(self, addr, data)
    }

    #[inline]
    fn mirroring(&self) -> Mirroring {
        Cartridge::mirroring(self)
    }
}

/// An empty cartridge slot claims nothing and uses horizontal mirroring.
impl<T: PpuBus> PpuBus for Option<T> {
    fn ppu_read(&self, addr: u16) -> Option<u8> {
        self.as_ref().and_then(|cart| cart.ppu_read(addr))
    }

    fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        self.as_mut().is_some_and(|cart| cart.ppu_write(addr, data))
    }

    fn mirroring(&self) -> Mirroring {
        self.as_ref()
            .map_or(Mirroring::Horizontal, |cart| cart.mirroring())
    }
}
