/*!
PPU (2C02) implementation, clocked one dot at a time.

Timing model:
- `dot` runs 0..=340 and `scanline` runs -1..=260. Scanline -1 is the
  pre-render line, 0..=239 are visible, 240 is idle and 241..=260 are VBlank.
- Each `clock` performs the work of the current dot and then advances the
  counters. Wrapping past scanline 260 raises `frame_complete`.
- On odd frames with rendering enabled the idle dot (0, 0) is skipped, making
  the frame 89341 dots instead of 89342.

STRUCTURE:
- `registers.rs` : typed $2000/$2001/$2002 flags and the CPU register window.
- `scroll.rs`    : loopy `v`/`t` register.
- `memory.rs`    : PPU address space (pattern, nametable, palette).
- `fetch.rs`     : background fetch pipeline and scroll increments.
- `oam_eval.rs`  : per-scanline sprite evaluation and pattern fetch.
- `sprite.rs`    : sprite shifters and foreground pixel selection.
- `renderer.rs`  : the dot state machine and pixel compositing.
- `frame.rs`     : RGB frame buffer and the NTSC master palette.

The PPU owns nametable, palette and OAM storage. Pattern memory and the
mirroring arrangement come from a `PpuBus` passed into every call.
*/

pub(crate) mod fetch;
pub mod frame;
pub(crate) mod memory;
pub(crate) mod oam_eval;
pub mod registers;
pub(crate) mod renderer;
pub mod scroll;
pub(crate) mod sprite;

pub use frame::{Frame, MASTER_PALETTE, NES_HEIGHT, NES_WIDTH, Rgb};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::Loopy;

use fetch::BackgroundPipeline;
use oam_eval::SpriteLine;

pub struct Ppu {
    // CPU-visible registers
    ctrl: PpuCtrl,
    mask: PpuMask,
    status: PpuStatus,
    oam_addr: u8,

    // Scroll/address state
    vram: Loopy,
    tram: Loopy,
    fine_x: u8,
    write_latch: bool,
    data_buffer: u8,

    // Memory
    oam: [u8; 256],
    nametables: [[u8; 1024]; 2],
    palette: [u8; 32],
    patterns: [[u8; 4096]; 2],

    // Timing
    dot: u16,
    scanline: i16,
    frame_complete: bool,
    odd_frame: bool,
    nmi: bool,

    // Pipelines
    bg: BackgroundPipeline,
    sprites: SpriteLine,

    frame: Frame,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            ctrl: PpuCtrl::empty(),
            mask: PpuMask::empty(),
            status: PpuStatus::empty(),
            oam_addr: 0,
            vram: Loopy::default(),
            tram: Loopy::default(),
            fine_x: 0,
            write_latch: false,
            data_buffer: 0,
            oam: [0; 256],
            nametables: [[0; 1024]; 2],
            palette: [0; 32],
            patterns: [[0; 4096]; 2],
            dot: 0,
            scanline: 0,
            frame_complete: false,
            odd_frame: false,
            nmi: false,
            bg: BackgroundPipeline::default(),
            sprites: SpriteLine::default(),
            frame: Frame::new(),
        }
    }

    /// Return registers, latches and timing to power-up state.
    /// Memory contents (nametables, palette, OAM) are left alone.
    pub fn reset(&mut self) {
        self.ctrl = PpuCtrl::empty();
        self.mask = PpuMask::empty();
        self.status = PpuStatus::empty();
        self.oam_addr = 0;
        self.vram = Loopy::default();
        self.tram = Loopy::default();
        self.fine_x = 0;
        self.write_latch = false;
        self.data_buffer = 0;
        self.dot = 0;
        self.scanline = 0;
        self.frame_complete = false;
        self.odd_frame = false;
        self.nmi = false;
        self.bg = BackgroundPipeline::default();
        self.sprites = SpriteLine::default();
    }

    // Frame completion & NMI latch
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi
    }

    /// Consume the NMI line. Returns true once per raised edge.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    /// Finished (or in-progress) picture.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn odd_frame(&self) -> bool {
        self.odd_frame
    }

    pub fn vram_addr(&self) -> Loopy {
        self.vram
    }

    pub fn temp_addr(&self) -> Loopy {
        self.tram
    }

    pub fn fine_x(&self) -> u8 {
        self.fine_x
    }

    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    /// OAM write at the current OAM address (the DMA path), advancing it.
    pub fn write_oam_data(&mut self, data: u8) {
        self.oam[self.oam_addr as usize] = data;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    /// Number of sprites selected for the scanline being drawn.
    pub fn sprite_count(&self) -> u8 {
        self.sprites.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_up_state() {
        let ppu = Ppu::new();
        assert_eq!((ppu.scanline(), ppu.dot()), (0, 0));
        assert!(!ppu.frame_complete());
        assert!(!ppu.nmi_pending());
        assert_eq!(ppu.status(), PpuStatus::empty());
        assert_eq!(ppu.frame().pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn oam_data_path_wraps_address() {
        let mut ppu = Ppu::new();
        ppu.oam_addr = 0xFF;
        ppu.write_oam_data(0x12);
        ppu.write_oam_data(0x34);
        assert_eq!(ppu.oam()[0xFF], 0x12);
        assert_eq!(ppu.oam()[0x00], 0x34);
    }

    #[test]
    fn reset_keeps_memory_but_clears_latches() {
        let mut ppu = Ppu::new();
        ppu.oam[3] = 9;
        ppu.write_latch = true;
        ppu.status.insert(PpuStatus::VBLANK);
        ppu.nmi = true;
        ppu.reset();
        assert_eq!(ppu.oam()[3], 9);
        assert!(!ppu.write_latch);
        assert!(!ppu.take_nmi());
        assert_eq!(ppu.status(), PpuStatus::empty());
    }
}
