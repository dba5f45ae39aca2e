#![doc = r#"
PPU registers module

Purpose
- Typed control/mask/status registers (`PpuCtrl`, `PpuMask`, `PpuStatus`) with
  lossless conversion to and from the 8-bit wire value (`bits()` /
  `from_bits_retain`).
- CPU-visible register semantics for the 8-byte window at $2000-$2007.

Notes
- The Bus masks the address with `& 7` before calling in; this module also
  masks so direct callers can pass either form.
- $2002 read returns `(status & 0xE0) | (data_buffer & 0x1F)`, clears VBlank
  and resets the shared write latch.
- $2005/$2006 writes target the temporary loopy register `t`; the second
  $2006 write copies `t` into `v`.
- $2007 reads are buffered below $3F00. Palette reads return immediately
  (the buffer still refills). Both directions advance `v` by 1 or 32.
- Write-only registers read back as 0.
"#]

use bitflags::bitflags;

use super::Ppu;
use crate::ppu_bus::PpuBus;

bitflags! {
    /// $2000 PPUCTRL.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PpuCtrl: u8 {
        const NAMETABLE_X        = 0x01;
        const NAMETABLE_Y        = 0x02;
        const INCREMENT_MODE     = 0x04;
        const PATTERN_SPRITE     = 0x08;
        const PATTERN_BACKGROUND = 0x10;
        const SPRITE_SIZE        = 0x20;
        const SLAVE_MODE         = 0x40;
        const ENABLE_NMI         = 0x80;
    }
}

bitflags! {
    /// $2001 PPUMASK.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PpuMask: u8 {
        const GRAYSCALE         = 0x01;
        const SHOW_BG_LEFT      = 0x02;
        const SHOW_SPRITES_LEFT = 0x04;
        const SHOW_BACKGROUND   = 0x08;
        const SHOW_SPRITES      = 0x10;
        const EMPHASIZE_RED     = 0x20;
        const EMPHASIZE_GREEN   = 0x40;
        const EMPHASIZE_BLUE    = 0x80;
    }
}

bitflags! {
    /// $2002 PPUSTATUS (only the top three bits are real).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0x20;
        const SPRITE_ZERO_HIT = 0x40;
        const VBLANK          = 0x80;
    }
}

impl PpuCtrl {
    /// VRAM address step applied after each $2007 access.
    #[inline]
    pub fn vram_increment(self) -> u16 {
        if self.contains(PpuCtrl::INCREMENT_MODE) { 32 } else { 1 }
    }

    /// Sprite height in rows (8 or 16).
    #[inline]
    pub fn sprite_height(self) -> i16 {
        if self.contains(PpuCtrl::SPRITE_SIZE) { 16 } else { 8 }
    }

    #[inline]
    pub fn background_table(self) -> u16 {
        if self.contains(PpuCtrl::PATTERN_BACKGROUND) { 0x1000 } else { 0 }
    }

    #[inline]
    pub fn sprite_table(self) -> u16 {
        if self.contains(PpuCtrl::PATTERN_SPRITE) { 0x1000 } else { 0 }
    }
}

impl PpuMask {
    #[inline]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(PpuMask::SHOW_BACKGROUND | PpuMask::SHOW_SPRITES)
    }
}

impl Ppu {
    /// CPU-visible register read ($2000-$2007, mirrored).
    pub fn cpu_read<B: PpuBus + ?Sized>(&mut self, addr: u16, bus: &B) -> u8 {
        match addr & 0x7 {
            0x2 => {
                let v = (self.status.bits() & 0xE0) | (self.data_buffer & 0x1F);
                self.status.remove(PpuStatus::VBLANK);
                self.write_latch = false;
                v
            }
            0x4 => self.oam[self.oam_addr as usize],
            0x7 => {
                let addr = self.vram.bits();
                let mut data = self.data_buffer;
                self.data_buffer = self.ppu_read(bus, addr);
                if addr & 0x3FFF >= 0x3F00 {
                    data = self.data_buffer;
                }
                self.advance_vram_addr();
                data
            }
            // Control, mask, OAM address, scroll and address are write-only.
            _ => 0,
        }
    }

    /// CPU-visible register write ($2000-$2007, mirrored).
    pub fn cpu_write<B: PpuBus + ?Sized>(&mut self, addr: u16, data: u8, bus: &mut B) {
        match addr & 0x7 {
            0x0 => {
                let was_enabled = self.ctrl.contains(PpuCtrl::ENABLE_NMI);
                self.ctrl = PpuCtrl::from_bits_retain(data);
                self.tram
                    .set_nametable_x(self.ctrl.contains(PpuCtrl::NAMETABLE_X));
                self.tram
                    .set_nametable_y(self.ctrl.contains(PpuCtrl::NAMETABLE_Y));
                if !was_enabled
                    && self.ctrl.contains(PpuCtrl::ENABLE_NMI)
                    && self.status.contains(PpuStatus::VBLANK)
                {
                    self.nmi = true;
                }
            }
            0x1 => self.mask = PpuMask::from_bits_retain(data),
            0x2 => {}
            0x3 => self.oam_addr = data,
            0x4 => {
                self.oam[self.oam_addr as usize] = data;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            0x5 => {
                if !self.write_latch {
                    self.fine_x = data & 0x07;
                    self.tram.set_coarse_x(data >> 3);
                } else {
                    self.tram.set_fine_y(data & 0x07);
                    self.tram.set_coarse_y(data >> 3);
                }
                self.write_latch = !self.write_latch;
            }
            0x6 => {
                if !self.write_latch {
                    let t = (self.tram.bits() & 0x00FF) | (((data & 0x3F) as u16) << 8);
                    self.tram.set_bits(t);
                } else {
                    let t = (self.tram.bits() & 0xFF00) | data as u16;
                    self.tram.set_bits(t);
                    self.vram = self.tram;
                }
                self.write_latch = !self.write_latch;
            }
            _ => {
                self.ppu_write(bus, self.vram.bits(), data);
                self.advance_vram_addr();
            }
        }
    }

    #[inline]
    fn advance_vram_addr(&mut self) {
        let next = self.vram.bits().wrapping_add(self.ctrl.vram_increment());
        self.vram.set_bits(next);
    }

    pub fn ctrl(&self) -> PpuCtrl {
        self.ctrl
    }

    pub fn mask(&self) -> PpuMask {
        self.mask
    }

    pub fn status(&self) -> PpuStatus {
        self.status
    }
}
