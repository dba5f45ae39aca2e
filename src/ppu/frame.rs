//! RGB frame buffer and the NTSC master palette.

/// Screen width in pixels.
pub const NES_WIDTH: usize = 256;
/// Screen height in pixels.
pub const NES_HEIGHT: usize = 240;
/// RGB bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 3;

pub type Rgb = [u8; 3];

/// 2C02 NTSC master palette, indexed by the 6-bit color value.
pub const MASTER_PALETTE: [Rgb; 64] = [
    [84, 84, 84],
    [0, 30, 116],
    [8, 16, 144],
    [48, 0, 136],
    [68, 0, 100],
    [92, 0, 48],
    [84, 4, 0],
    [60, 24, 0],
    [32, 42, 0],
    [8, 58, 0],
    [0, 64, 0],
    [0, 60, 0],
    [0, 50, 60],
    [0, 0, 0],
    [0, 0, 0],
    [0, 0, 0],
    [152, 150, 152],
    [8, 76, 196],
    [48, 50, 236],
    [92, 30, 228],
    [136, 20, 176],
    [160, 20, 100],
    [152, 34, 32],
    [120, 60, 0],
    [84, 90, 0],
    [40, 114, 0],
    [8, 124, 0],
    [0, 118, 40],
    [0, 102, 120],
    [0, 0, 0],
    [0, 0, 0],
    [0, 0, 0],
    [236, 238, 236],
    [76, 154, 236],
    [120, 124, 236],
    [176, 98, 236],
    [228, 84, 236],
    [236, 88, 180],
    [236, 106, 100],
    [212, 136, 32],
    [160, 170, 0],
    [116, 196, 0],
    [76, 208, 32],
    [56, 204, 108],
    [56, 180, 204],
    [60, 60, 60],
    [0, 0, 0],
    [0, 0, 0],
    [236, 238, 236],
    [168, 204, 236],
    [188, 188, 236],
    [212, 178, 236],
    [236, 174, 236],
    [236, 174, 212],
    [236, 180, 176],
    [228, 196, 144],
    [204, 210, 120],
    [180, 222, 120],
    [168, 226, 144],
    [152, 226, 180],
    [160, 214, 228],
    [160, 162, 160],
    [0, 0, 0],
    [0, 0, 0],
];

/// A 256x240 picture stored row-major as packed RGB bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; NES_WIDTH * NES_HEIGHT * BYTES_PER_PIXEL],
        }
    }

    /// Color at `(x, y)`. Out-of-range coordinates read as black.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        if x >= NES_WIDTH || y >= NES_HEIGHT {
            return [0, 0, 0];
        }
        let i = (y * NES_WIDTH + x) * BYTES_PER_PIXEL;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: Rgb) {
        if x >= NES_WIDTH || y >= NES_HEIGHT {
            return;
        }
        let i = (y * NES_WIDTH + x) * BYTES_PER_PIXEL;
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgb);
    }

    /// Raw RGB bytes, `NES_WIDTH * NES_HEIGHT * 3` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Write the frame as a PNG file.
    #[cfg(feature = "screenshot")]
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            NES_WIDTH as u32,
            NES_HEIGHT as u32,
            image::ColorType::Rgb8,
        )
    }
}
