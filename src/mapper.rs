/*!
Mapper subsystem: translation trait and NROM (mapper 0).

Purpose:
- Decouple cartridge address translation from the `Cartridge` storage so
  bank-switching schemes are interchangeable.
- A mapper never touches memory itself. It turns a CPU or PPU address into an
  offset into PRG or CHR memory (or declines it) and the `Cartridge` performs
  the actual access.

Contract:
- `cpu_map_read` / `ppu_map_read` / `ppu_map_write` return `None` when the
  address is outside the mapper's space, or `Some(offset)`.
- `cpu_map_write` never yields a PRG offset: PRG is ROM. A write in mapper
  space is either latched into a bank-select register or dropped, and both
  report `MappedWrite::Register`.
- Offsets are always inside the target array: bank math is masked or reduced
  modulo the bank count, never trusted from the written value.

PRG RAM at $6000-$7FFF is owned by the cartridge and never reaches a mapper.
*/

use std::fmt::Debug;

/// Size of one PRG bank in bytes.
pub const PRG_BANK_SIZE: usize = 16 * 1024;
/// Size of one CHR bank in bytes.
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Outcome of translating a CPU write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MappedWrite {
    /// Address is not in this mapper's space.
    Unmapped,
    /// Write was claimed by the mapper: latched into a register (bank
    /// select) or absorbed by ROM.
    Register,
}

/// Common interface all cartridge mappers implement.
pub trait Mapper: Debug {
    /// Mapper numeric identifier (e.g., 0 for NROM).
    fn mapper_id(&self) -> u8;

    /// Translate a CPU read in cartridge space into a PRG offset.
    fn cpu_map_read(&self, addr: u16) -> Option<usize>;

    /// Translate a CPU write. May update bank-select state as a side effect.
    fn cpu_map_write(&mut self, addr: u16, data: u8) -> MappedWrite;

    /// Translate a PPU read in pattern space into a CHR offset.
    fn ppu_map_read(&self, addr: u16) -> Option<usize>;

    /// Translate a PPU write in pattern space into a CHR offset (CHR RAM only).
    fn ppu_map_write(&self, addr: u16) -> Option<usize>;

    /// Reset/Power-on mapper state (bank registers).
    fn reset(&mut self) {}
}

/// NROM (mapper 0).
///
/// - PRG: 16 KiB (NROM-128) mirrored into $8000-$FFFF, or 32 KiB (NROM-256) direct.
/// - CHR: flat 8 KiB window; writable only when the cartridge supplied no CHR ROM.
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_banks: u8,
    chr_banks: u8,
}

impl Nrom {
    pub fn new(prg_banks: u8, chr_banks: u8) -> Self {
        Self {
            prg_banks,
            chr_banks,
        }
    }

    #[inline]
    fn prg_mask(&self) -> u16 {
        if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF }
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u8 {
        0
    }

    fn cpu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x8000..=0xFFFF => Some((addr & self.prg_mask()) as usize),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, _data: u8) -> MappedWrite {
        match addr {
            // No registers on NROM; ROM swallows the write.
            0x8000..=0xFFFF => MappedWrite::Register,
            _ => MappedWrite::Unmapped,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some(addr as usize),
            _ => None,
        }
    }

    fn ppu_map_write(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(addr as usize),
            _ => None,
        }
    }
}
