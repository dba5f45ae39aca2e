//! Loopy scroll/address register.
//!
//! 15-bit packed layout:
//!
//! ```text
//! yyy NN YYYYY XXXXX
//! ||| || ||||| +++++-- coarse X (tile column)
//! ||| || +++++-------- coarse Y (tile row)
//! ||| |+-------------- nametable X
//! ||| +--------------- nametable Y
//! +++----------------- fine Y (row within tile)
//! ```
//!
//! The PPU keeps two of these: `v` (current, used for memory access) and `t`
//! (temporary, written by $2000/$2005/$2006 and copied into `v` at fixed dots).

const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const FINE_Y: u16 = 0x7000;

const HORIZONTAL: u16 = COARSE_X | NAMETABLE_X;
const VERTICAL: u16 = COARSE_Y | NAMETABLE_Y | FINE_Y;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Loopy(u16);

impl Loopy {
    pub fn new(bits: u16) -> Self {
        Loopy(bits & 0x7FFF)
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set_bits(&mut self, bits: u16) {
        self.0 = bits & 0x7FFF;
    }

    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & COARSE_X) as u8
    }

    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & COARSE_Y) >> 5) as u8
    }

    #[inline]
    pub fn nametable_x(self) -> bool {
        self.0 & NAMETABLE_X != 0
    }

    #[inline]
    pub fn nametable_y(self) -> bool {
        self.0 & NAMETABLE_Y != 0
    }

    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & FINE_Y) >> 12) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, v: u8) {
        self.0 = (self.0 & !COARSE_X) | (v as u16 & 0x1F);
    }

    #[inline]
    pub fn set_coarse_y(&mut self, v: u8) {
        self.0 = (self.0 & !COARSE_Y) | ((v as u16 & 0x1F) << 5);
    }

    #[inline]
    pub fn set_nametable_x(&mut self, on: bool) {
        self.0 = (self.0 & !NAMETABLE_X) | if on { NAMETABLE_X } else { 0 };
    }

    #[inline]
    pub fn set_nametable_y(&mut self, on: bool) {
        self.0 = (self.0 & !NAMETABLE_Y) | if on { NAMETABLE_Y } else { 0 };
    }

    #[inline]
    pub fn set_fine_y(&mut self, v: u8) {
        self.0 = (self.0 & !FINE_Y) | ((v as u16 & 0x07) << 12);
    }

    /// Nametable byte address for the tile under `v`.
    #[inline]
    pub fn tile_address(self) -> u16 {
        0x2000 | (self.0 & 0x0FFF)
    }

    /// Attribute byte address for the tile under `v`.
    #[inline]
    pub fn attribute_address(self) -> u16 {
        0x23C0
            | (self.0 & (NAMETABLE_X | NAMETABLE_Y))
            | ((self.coarse_y() as u16 >> 2) << 3)
            | (self.coarse_x() as u16 >> 2)
    }

    /// Move one tile right, wrapping into the horizontally adjacent nametable.
    pub fn increment_x(&mut self) {
        if self.coarse_x() == 31 {
            self.set_coarse_x(0);
            self.set_nametable_x(!self.nametable_x());
        } else {
            self.set_coarse_x(self.coarse_x() + 1);
        }
    }

    /// Move one pixel row down. Row 29 wraps into the vertically adjacent
    /// nametable; rows 30/31 (attribute memory) wrap without switching.
    pub fn increment_y(&mut self) {
        if self.fine_y() < 7 {
            self.set_fine_y(self.fine_y() + 1);
            return;
        }
        self.set_fine_y(0);
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.set_nametable_y(!self.nametable_y());
            }
            31 => self.set_coarse_y(0),
            y => self.set_coarse_y(y + 1),
        }
    }

    /// Copy coarse X and nametable X from `src`.
    #[inline]
    pub fn copy_horizontal(&mut self, src: Loopy) {
        self.0 = (self.0 & !HORIZONTAL) | (src.0 & HORIZONTAL);
    }

    /// Copy coarse Y, nametable Y and fine Y from `src`.
    #[inline]
    pub fn copy_vertical(&mut self, src: Loopy) {
        self.0 = (self.0 & !VERTICAL) | (src.0 & VERTICAL);
    }
}
