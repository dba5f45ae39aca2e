#![doc = r#"
PPU sprite helpers

Responsibilities
- Per-dot sprite shifting: each selected sprite counts its X down to zero,
  then shifts its pattern rows left one bit per dot.
- Foreground pixel selection: the first (lowest OAM index) selected sprite
  whose X counter is zero and whose pixel is opaque wins.
- Bit reversal for horizontal flip (`reverse8`).
"#]

use super::oam_eval::SpriteLine;

/// Reverse the bit order of a byte.
#[inline]
pub fn reverse8(b: u8) -> u8 {
    b.reverse_bits()
}

/// Winning sprite pixel for the current dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ForegroundPixel {
    pub pixel: u8,
    pub palette: u8,
    pub behind_background: bool,
    /// Came from buffer slot 0.
    pub first_slot: bool,
}

impl SpriteLine {
    /// Advance every selected sprite by one dot.
    pub fn shift(&mut self) {
        for i in 0..self.count as usize {
            let entry = &mut self.entries[i];
            if entry.x > 0 {
                entry.x -= 1;
            } else {
                self.pattern_lo[i] <<= 1;
                self.pattern_hi[i] <<= 1;
            }
        }
    }

    /// Sprite pixel at the current dot, if any sprite is opaque here.
    pub fn foreground(&self) -> Option<ForegroundPixel> {
        (0..self.count as usize)
            .filter(|&i| self.entries[i].x == 0)
            .find_map(|i| {
                let lo = (self.pattern_lo[i] & 0x80 != 0) as u8;
                let hi = (self.pattern_hi[i] & 0x80 != 0) as u8;
                let pixel = (hi << 1) | lo;
                (pixel != 0).then(|| ForegroundPixel {
                    pixel,
                    palette: self.entries[i].palette(),
                    behind_background: self.entries[i].behind_background(),
                    first_slot: i == 0,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::oam_eval::{ATTR_BEHIND_BACKGROUND, OamEntry};

    fn line_with(entries: &[(OamEntry, u8, u8)]) -> SpriteLine {
        let mut line = SpriteLine::default();
        for (i, (entry, lo, hi)) in entries.iter().enumerate() {
            line.entries[i] = *entry;
            line.pattern_lo[i] = *lo;
            line.pattern_hi[i] = *hi;
        }
        line.count = entries.len() as u8;
        line
    }

    #[test]
    fn reverse8_mirrors_bits() {
        assert_eq!(reverse8(0b1000_0000), 0b0000_0001);
        assert_eq!(reverse8(0b1100_1010), 0b0101_0011);
    }

    #[test]
    fn sprite_waits_for_x_then_shifts() {
        let entry = OamEntry { y: 0, id: 0, attribute: 0, x: 2 };
        let mut line = line_with(&[(entry, 0b0100_0000, 0)]);
        assert!(line.foreground().is_none(), "x counter not yet zero");
        line.shift();
        line.shift();
        assert_eq!(line.entries[0].x, 0);
        assert!(line.foreground().is_none(), "first pixel is transparent");
        line.shift();
        let fg = line.foreground().expect("second pixel opaque");
        assert_eq!((fg.pixel, fg.palette), (1, 4));
        assert!(fg.first_slot);
    }

    #[test]
    fn lower_slot_wins_and_transparent_falls_through() {
        let a = OamEntry { y: 0, id: 0, attribute: 0x01, x: 0 };
        let b = OamEntry { y: 0, id: 0, attribute: 0x02 | ATTR_BEHIND_BACKGROUND, x: 0 };
        let line = line_with(&[(a, 0x80, 0x80), (b, 0x80, 0x00)]);
        let fg = line.foreground().expect("opaque");
        assert_eq!((fg.pixel, fg.palette, fg.first_slot), (3, 5, true));

        let line = line_with(&[(a, 0x00, 0x00), (b, 0x80, 0x00)]);
        let fg = line.foreground().expect("opaque");
        assert_eq!((fg.pixel, fg.palette, fg.first_slot), (1, 6, false));
        assert!(fg.behind_background);
    }
}
