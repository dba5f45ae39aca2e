#![doc = r#"
PPU OAM evaluation submodule

Responsibilities
- Dot 257: scan the 64 primary OAM entries and select up to eight whose rows
  cover the current scanline (8x8 or 8x16 depending on PPUCTRL). A ninth
  match sets the overflow flag and stops the scan.
- Dot 340: fetch one pattern row (low and high plane) per selected sprite,
  applying vertical and horizontal flip, into the per-sprite shifters.

The selected entries, their shifters and the sprite-zero latches live in
`SpriteLine`; `sprite.rs` consumes them while compositing.
"#]

use super::Ppu;
use super::registers::{PpuCtrl, PpuStatus};
use super::sprite::reverse8;
use crate::ppu_bus::PpuBus;

/// Maximum number of sprites drawn on one scanline.
pub const SPRITES_PER_LINE: usize = 8;

/// Attribute byte bits.
pub const ATTR_PALETTE: u8 = 0x03;
pub const ATTR_BEHIND_BACKGROUND: u8 = 0x20;
pub const ATTR_FLIP_H: u8 = 0x40;
pub const ATTR_FLIP_V: u8 = 0x80;

/// One 4-byte OAM record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OamEntry {
    pub y: u8,
    pub id: u8,
    pub attribute: u8,
    pub x: u8,
}

impl Default for OamEntry {
    /// Cleared secondary OAM reads back as all ones.
    fn default() -> Self {
        Self {
            y: 0xFF,
            id: 0xFF,
            attribute: 0xFF,
            x: 0xFF,
        }
    }
}

impl OamEntry {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            id: bytes[1],
            attribute: bytes[2],
            x: bytes[3],
        }
    }

    #[inline]
    pub fn palette(&self) -> u8 {
        (self.attribute & ATTR_PALETTE) + 4
    }

    #[inline]
    pub fn behind_background(&self) -> bool {
        self.attribute & ATTR_BEHIND_BACKGROUND != 0
    }
}

/// Sprites selected for the scanline being drawn.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SpriteLine {
    pub entries: [OamEntry; SPRITES_PER_LINE],
    pub count: u8,
    pub pattern_lo: [u8; SPRITES_PER_LINE],
    pub pattern_hi: [u8; SPRITES_PER_LINE],
    /// OAM entry 0 was selected for this line.
    pub zero_possible: bool,
    /// Entry 0 produced the foreground pixel at the current dot.
    pub zero_rendering: bool,
}

impl SpriteLine {
    /// Empty the buffer and shifters ahead of a new evaluation.
    pub fn clear(&mut self) {
        self.entries = [OamEntry::default(); SPRITES_PER_LINE];
        self.count = 0;
        self.clear_shifters();
        self.zero_possible = false;
    }

    pub fn clear_shifters(&mut self) {
        self.pattern_lo = [0; SPRITES_PER_LINE];
        self.pattern_hi = [0; SPRITES_PER_LINE];
    }

    pub fn selected(&self) -> &[OamEntry] {
        &self.entries[..self.count as usize]
    }
}

impl Ppu {
    /// Select the sprites covering the current scanline.
    pub(crate) fn evaluate_sprites(&mut self) {
        self.sprites.clear();
        let height = self.ctrl.sprite_height();

        for (index, bytes) in self.oam.chunks_exact(4).enumerate() {
            let entry = OamEntry::from_bytes(bytes);
            let row = self.scanline - entry.y as i16;
            if !(0..height).contains(&row) {
                continue;
            }
            if self.sprites.count as usize == SPRITES_PER_LINE {
                self.status.insert(PpuStatus::SPRITE_OVERFLOW);
                break;
            }
            if index == 0 {
                self.sprites.zero_possible = true;
            }
            self.sprites.entries[self.sprites.count as usize] = entry;
            self.sprites.count += 1;
        }
    }

    /// Load pattern rows for every selected sprite into its shifters.
    pub(crate) fn fetch_sprite_patterns<B: PpuBus + ?Sized>(&mut self, bus: &B) {
        for i in 0..self.sprites.count as usize {
            let entry = self.sprites.entries[i];
            let addr = self.sprite_row_address(&entry);
            let mut lo = self.ppu_read(bus, addr);
            let mut hi = self.ppu_read(bus, addr + 8);
            if entry.attribute & ATTR_FLIP_H != 0 {
                lo = reverse8(lo);
                hi = reverse8(hi);
            }
            self.sprites.pattern_lo[i] = lo;
            self.sprites.pattern_hi[i] = hi;
        }
    }

    /// Pattern address of the row of `entry` that falls on this scanline.
    fn sprite_row_address(&self, entry: &OamEntry) -> u16 {
        let row = (self.scanline - entry.y as i16) as u16;
        let flip_v = entry.attribute & ATTR_FLIP_V != 0;

        if !self.ctrl.contains(PpuCtrl::SPRITE_SIZE) {
            let row = if flip_v { 7 - row } else { row };
            return self.ctrl.sprite_table() | ((entry.id as u16) << 4) | row;
        }

        // 8x16: table from bit 0 of the id, top tile is the even id.
        let table = ((entry.id & 0x01) as u16) << 12;
        let top = (entry.id & 0xFE) as u16;
        let in_top_half = (row < 8) != flip_v;
        let tile = if in_top_half { top } else { top + 1 };
        let fine = if flip_v { 7 - (row & 0x07) } else { row & 0x07 };
        table | (tile << 4) | fine
    }
}
