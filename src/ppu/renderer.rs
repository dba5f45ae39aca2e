#![doc = r#"
PPU renderer module

Responsibilities
- `Ppu::clock`: the per-dot state machine. Runs the work for the current
  (scanline, dot), composites a pixel on visible dots, then advances the
  counters.
- Background and sprite compositing with priority, left-edge masking and
  sprite-zero hit detection.

Dot map for scanlines -1..=239:

| dot          | work                                                   |
|--------------|--------------------------------------------------------|
| 1 (line -1)  | clear VBlank, sprite-zero hit, overflow, sprite shifters |
| 2..=257      | shift, then fetch by `(dot - 1) % 8`                   |
| 256          | increment Y                                            |
| 257          | reload shifters, copy horizontal bits, evaluate sprites (rendering on) |
| 280..=304    | (line -1 only) copy vertical bits                      |
| 321..=337    | shift, then fetch (first two tiles of next line)       |
| 338, 340     | dummy nametable reads                                  |
| 340          | sprite pattern fetch                                   |

Scanline 241 dot 1 sets VBlank and raises NMI when enabled.
"#]

use super::Ppu;
use super::registers::{PpuCtrl, PpuMask, PpuStatus};
use crate::ppu_bus::PpuBus;

const DOTS_PER_LINE: u16 = 341;
const PRE_RENDER_LINE: i16 = -1;
const LAST_VISIBLE_LINE: i16 = 239;
const VBLANK_LINE: i16 = 241;
const LAST_LINE: i16 = 260;

impl Ppu {
    /// Advance one PPU dot (invoked 3x per CPU cycle by the bus).
    pub fn clock<B: PpuBus + ?Sized>(&mut self, bus: &B) {
        if (PRE_RENDER_LINE..=LAST_VISIBLE_LINE).contains(&self.scanline) {
            self.render_line_dot(bus);
        }

        if self.scanline == VBLANK_LINE && self.dot == 1 {
            self.status.insert(PpuStatus::VBLANK);
            if self.ctrl.contains(PpuCtrl::ENABLE_NMI) {
                self.nmi = true;
            }
        }

        if (0..=LAST_VISIBLE_LINE).contains(&self.scanline) && (1..=256).contains(&self.dot) {
            self.composite(bus);
        }

        self.advance();
    }

    fn render_line_dot<B: PpuBus + ?Sized>(&mut self, bus: &B) {
        let dot = self.dot;

        if self.scanline == 0 && dot == 0 && self.odd_frame && self.rendering_enabled() {
            // Odd frame: skip the idle dot.
            self.dot = 1;
        }

        if self.scanline == PRE_RENDER_LINE && dot == 1 {
            self.status.remove(
                PpuStatus::VBLANK | PpuStatus::SPRITE_ZERO_HIT | PpuStatus::SPRITE_OVERFLOW,
            );
            self.sprites.clear_shifters();
        }

        if (2..258).contains(&dot) || (321..338).contains(&dot) {
            self.update_shifters();
            self.background_fetch(bus, (dot - 1) % 8);
        }

        if dot == 256 {
            self.increment_scroll_y();
        }

        if dot == 257 {
            self.bg.load_shifters();
            self.transfer_address_x();
            if self.scanline >= 0 && self.rendering_enabled() {
                self.evaluate_sprites();
            } else {
                self.sprites.clear();
            }
        }

        if dot == 338 || dot == 340 {
            self.bg.next_tile_id = self.ppu_read(bus, self.vram.tile_address());
        }

        if self.scanline == PRE_RENDER_LINE && (280..305).contains(&dot) {
            self.transfer_address_y();
        }

        if dot == 340 {
            self.fetch_sprite_patterns(bus);
        }
    }

    /// Pick the visible pixel for (dot - 1, scanline) and write it to the frame.
    fn composite<B: PpuBus + ?Sized>(&mut self, bus: &B) {
        let x = self.dot - 1;
        let left_edge = x < 8;

        let (mut bg_pixel, mut bg_palette) = (0, 0);
        if self.mask.contains(PpuMask::SHOW_BACKGROUND)
            && (!left_edge || self.mask.contains(PpuMask::SHOW_BG_LEFT))
        {
            (bg_pixel, bg_palette) = self.bg.pixel(self.fine_x);
        }

        let mut fg = None;
        self.sprites.zero_rendering = false;
        if self.mask.contains(PpuMask::SHOW_SPRITES)
            && (!left_edge || self.mask.contains(PpuMask::SHOW_SPRITES_LEFT))
        {
            fg = self.sprites.foreground();
            self.sprites.zero_rendering = fg.is_some_and(|f| f.first_slot);
        }

        let (pixel, palette) = match fg {
            None => (bg_pixel, bg_palette),
            Some(f) if bg_pixel == 0 => (f.pixel, f.palette),
            Some(f) => {
                if self.sprites.zero_possible && self.sprites.zero_rendering {
                    self.check_sprite_zero_hit();
                }
                if f.behind_background {
                    (bg_pixel, bg_palette)
                } else {
                    (f.pixel, f.palette)
                }
            }
        };

        let rgb = self.palette_color(bus, palette, pixel);
        self.frame.set_pixel(x as usize, self.scanline as usize, rgb);
    }

    /// Both layers are opaque here and sprite 0 is on top of the stack.
    fn check_sprite_zero_hit(&mut self) {
        if !self.mask.contains(PpuMask::SHOW_BACKGROUND | PpuMask::SHOW_SPRITES) {
            return;
        }
        let both_left = self
            .mask
            .contains(PpuMask::SHOW_BG_LEFT | PpuMask::SHOW_SPRITES_LEFT);
        let window = if both_left { 1..258 } else { 9..258 };
        if window.contains(&self.dot) {
            self.status.insert(PpuStatus::SPRITE_ZERO_HIT);
        }
    }

    fn advance(&mut self) {
        self.dot += 1;
        if self.dot >= DOTS_PER_LINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_LINE {
                self.scanline = PRE_RENDER_LINE;
                self.frame_complete = true;
                self.odd_frame = !self.odd_frame;
            }
        }
    }
}
