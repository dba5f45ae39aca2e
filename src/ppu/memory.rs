#![doc = r#"
PPU memory submodule

Responsibilities
- The 14-bit PPU address space as seen by the PPU itself:
  * $0000-$1FFF pattern tables: the cartridge gets first refusal, otherwise
    the two internal 4 KiB tables are used.
  * $2000-$3EFF nametables: two 1 KiB pages arranged by the cartridge's
    mirroring mode ($3000-$3EFF mirrors $2000-$2EFF).
  * $3F00-$3FFF palette RAM: 32 bytes mirrored every 32, with entries
    $10/$14/$18/$1C aliasing $00/$04/$08/$0C.
- Palette-to-RGB lookup used by the compositor and the pattern table viewer.

Palette reads are masked to 6 bits, or to the gray column (`& 0x30`) while
grayscale is enabled.
"#]

use super::frame::{MASTER_PALETTE, Rgb};
use super::registers::PpuMask;
use super::Ppu;
use crate::cartridge::Mirroring;
use crate::ppu_bus::PpuBus;

/// Side length of a rendered pattern table, in pixels.
pub const PATTERN_TABLE_SIZE: usize = 128;

/// Physical nametable page (0 or 1) for a $2000-$2FFF address.
#[inline]
pub(crate) fn nametable_page(mirroring: Mirroring, addr: u16) -> usize {
    let quadrant = ((addr & 0x0FFF) / 0x0400) as usize;
    match mirroring {
        Mirroring::Vertical => quadrant & 1,
        Mirroring::Horizontal => quadrant >> 1,
        Mirroring::OneScreenLo => 0,
        Mirroring::OneScreenHi => 1,
    }
}

#[inline]
fn palette_index(addr: u16) -> usize {
    let mut i = (addr & 0x1F) as usize;
    if i & 0x13 == 0x10 {
        i &= 0x0F;
    }
    i
}

impl Ppu {
    /// Read from PPU address space.
    pub fn ppu_read<B: PpuBus + ?Sized>(&self, bus: &B, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        if let Some(data) = bus.ppu_read(addr) {
            return data;
        }
        match addr {
            0x0000..=0x1FFF => {
                self.patterns[(addr >> 12) as usize][(addr & 0x0FFF) as usize]
            }
            0x2000..=0x3EFF => {
                let page = nametable_page(bus.mirroring(), addr);
                self.nametables[page][(addr & 0x03FF) as usize]
            }
            _ => {
                let mask = if self.mask.contains(PpuMask::GRAYSCALE) { 0x30 } else { 0x3F };
                self.palette[palette_index(addr)] & mask
            }
        }
    }

    /// Write to PPU address space.
    pub fn ppu_write<B: PpuBus + ?Sized>(&mut self, bus: &mut B, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        if bus.ppu_write(addr, data) {
            return;
        }
        match addr {
            0x0000..=0x1FFF => {
                self.patterns[(addr >> 12) as usize][(addr & 0x0FFF) as usize] = data;
            }
            0x2000..=0x3EFF => {
                let page = nametable_page(bus.mirroring(), addr);
                self.nametables[page][(addr & 0x03FF) as usize] = data;
            }
            _ => self.palette[palette_index(addr)] = data,
        }
    }

    /// RGB color of `pixel` (0..=3) in `palette` (0..=7, sprites at 4..=7).
    pub fn palette_color<B: PpuBus + ?Sized>(&self, bus: &B, palette: u8, pixel: u8) -> Rgb {
        let entry = self.ppu_read(bus, 0x3F00 + ((palette as u16) << 2) + pixel as u16);
        MASTER_PALETTE[(entry & 0x3F) as usize]
    }

    /// Render one pattern table (0 or 1) as a 128x128 grid of 16x16 tiles,
    /// colored with `palette`. Row-major, one `Rgb` per pixel.
    pub fn pattern_table<B: PpuBus + ?Sized>(&self, bus: &B, table: u8, palette: u8) -> Vec<Rgb> {
        let base = (table as u16 & 1) * 0x1000;
        let mut out = vec![[0; 3]; PATTERN_TABLE_SIZE * PATTERN_TABLE_SIZE];
        for tile_y in 0..16u16 {
            for tile_x in 0..16u16 {
                let offset = tile_y * 256 + tile_x * 16;
                for row in 0..8u16 {
                    let mut lo = self.ppu_read(bus, base + offset + row);
                    let mut hi = self.ppu_read(bus, base + offset + row + 8);
                    for col in 0..8u16 {
                        let pixel = ((hi & 0x01) << 1) | (lo & 0x01);
                        lo >>= 1;
                        hi >>= 1;
                        let x = (tile_x * 8 + (7 - col)) as usize;
                        let y = (tile_y * 8 + row) as usize;
                        out[y * PATTERN_TABLE_SIZE + x] = self.palette_color(bus, palette, pixel);
                    }
                }
            }
        }
        out
    }
}
