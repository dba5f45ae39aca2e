#![doc = r#"
PPU background fetch pipeline

Responsibilities
- Per-8-dot fetch cycle: nametable byte, attribute byte, pattern low, pattern
  high, then coarse X increment.
- Four 16-bit shifters (pattern lo/hi, attribute lo/hi). The high byte is the
  tile being drawn, the low byte is the next tile, reloaded every 8 dots.
- Scroll increments and t->v transfers on the loopy `v` register.

Scroll operations are no-ops while rendering is disabled so that CPU writes
through $2006 stay intact outside of active rendering.
"#]

use super::Ppu;
use super::registers::PpuMask;
use crate::ppu_bus::PpuBus;

/// Background latches and shift registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BackgroundPipeline {
    pub next_tile_id: u8,
    pub next_tile_attrib: u8,
    pub next_tile_lsb: u8,
    pub next_tile_msb: u8,
    pub pattern_lo: u16,
    pub pattern_hi: u16,
    pub attrib_lo: u16,
    pub attrib_hi: u16,
}

impl BackgroundPipeline {
    /// Move the latched next tile into the low byte of every shifter.
    /// Attribute bits are widened to a full byte so they shift in step.
    pub fn load_shifters(&mut self) {
        self.pattern_lo = (self.pattern_lo & 0xFF00) | self.next_tile_lsb as u16;
        self.pattern_hi = (self.pattern_hi & 0xFF00) | self.next_tile_msb as u16;
        let widen = |bit: bool| if bit { 0x00FF } else { 0x0000 };
        self.attrib_lo = (self.attrib_lo & 0xFF00) | widen(self.next_tile_attrib & 0x01 != 0);
        self.attrib_hi = (self.attrib_hi & 0xFF00) | widen(self.next_tile_attrib & 0x02 != 0);
    }

    #[inline]
    pub fn shift(&mut self) {
        self.pattern_lo <<= 1;
        self.pattern_hi <<= 1;
        self.attrib_lo <<= 1;
        self.attrib_hi <<= 1;
    }

    /// `(pixel, palette)` under the fine X tap. Pixel 0 is transparent.
    pub fn pixel(&self, fine_x: u8) -> (u8, u8) {
        let mux = 0x8000u16 >> (fine_x & 0x07);
        let bit = |reg: u16| (reg & mux != 0) as u8;
        let pixel = (bit(self.pattern_hi) << 1) | bit(self.pattern_lo);
        let palette = (bit(self.attrib_hi) << 1) | bit(self.attrib_lo);
        (pixel, palette)
    }
}

impl Ppu {
    /// One step of the 8-dot background fetch cycle. `phase` is `(dot - 1) % 8`.
    pub(crate) fn background_fetch<B: PpuBus + ?Sized>(&mut self, bus: &B, phase: u16) {
        match phase {
            0 => {
                self.bg.load_shifters();
                self.bg.next_tile_id = self.ppu_read(bus, self.vram.tile_address());
            }
            2 => {
                let mut attrib = self.ppu_read(bus, self.vram.attribute_address());
                if self.vram.coarse_y() & 0x02 != 0 {
                    attrib >>= 4;
                }
                if self.vram.coarse_x() & 0x02 != 0 {
                    attrib >>= 2;
                }
                self.bg.next_tile_attrib = attrib & 0x03;
            }
            4 => self.bg.next_tile_lsb = self.ppu_read(bus, self.background_row_address()),
            6 => self.bg.next_tile_msb = self.ppu_read(bus, self.background_row_address() + 8),
            7 => self.increment_scroll_x(),
            _ => {}
        }
    }

    #[inline]
    fn background_row_address(&self) -> u16 {
        self.ctrl.background_table()
            + ((self.bg.next_tile_id as u16) << 4)
            + self.vram.fine_y() as u16
    }

    #[inline]
    pub(crate) fn rendering_enabled(&self) -> bool {
        self.mask.rendering_enabled()
    }

    pub(crate) fn increment_scroll_x(&mut self) {
        if self.rendering_enabled() {
            self.vram.increment_x();
        }
    }

    pub(crate) fn increment_scroll_y(&mut self) {
        if self.rendering_enabled() {
            self.vram.increment_y();
        }
    }

    pub(crate) fn transfer_address_x(&mut self) {
        if self.rendering_enabled() {
            self.vram.copy_horizontal(self.tram);
        }
    }

    pub(crate) fn transfer_address_y(&mut self) {
        if self.rendering_enabled() {
            self.vram.copy_vertical(self.tram);
        }
    }

    /// Shift background (and, in the sprite window, sprite) registers by one dot.
    pub(crate) fn update_shifters(&mut self) {
        if self.mask.contains(PpuMask::SHOW_BACKGROUND) {
            self.bg.shift();
        }
        if self.mask.contains(PpuMask::SHOW_SPRITES) && (1..258).contains(&self.dot) {
            self.sprites.shift();
        }
    }
}
