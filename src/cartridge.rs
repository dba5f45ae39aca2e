/*!
Cartridge: PRG/CHR storage plus the active Mapper.

Features:
- Construct from raw PRG/CHR arrays, a mapper id, bank counts and a mirroring
  mode (`Cartridge::new`). This is the core contract; any image loader sits on
  top of it.
- Convenience iNES (v1) loader (`from_ines_bytes`, `from_ines_file`) with
  trainer skipping; NES 2.0 images are rejected.
- Allocate 8 KiB CHR RAM when the image has no CHR banks.
- 8 KiB PRG RAM at $6000-$7FFF.

CPU/PPU entry points report whether the cartridge claimed the address: reads
return `Option<u8>`, writes return `bool`. The Bus gives the cartridge first
refusal on every access and falls through to its own devices on `None`/`false`.

Supported mappers:
- 0: NROM
- 2: UxROM
Any other id fails construction with `CartridgeError::UnsupportedMapper`.
*/

use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::mapper::{CHR_BANK_SIZE, MappedWrite, Mapper, Nrom, PRG_BANK_SIZE};
use crate::mappers::Uxrom;

/// Size of the cartridge PRG RAM window ($6000-$7FFF).
pub const PRG_RAM_SIZE: usize = 8 * 1024;

const INES_HEADER_LEN: usize = 16;
const INES_TRAINER_LEN: usize = 512;

/// Nametable mirroring mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    OneScreenLo,
    OneScreenHi,
}

/// Construction-time failures. Once a cartridge exists none of its
/// operations can fail.
#[derive(Debug)]
pub enum CartridgeError {
    /// Missing or malformed iNES header.
    InvalidHeader(&'static str),
    /// Header describes a format this loader does not read (e.g. NES 2.0).
    UnsupportedFormat(&'static str),
    /// A memory section is shorter than its declared size.
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    /// Mapper id has no implementation.
    UnsupportedMapper(u8),
    /// Bank counts that cannot describe a working cartridge.
    InvalidImage(&'static str),
    /// Reading the image file failed.
    Io(std::io::Error),
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::InvalidHeader(msg) => write!(f, "invalid iNES header: {msg}"),
            CartridgeError::UnsupportedFormat(msg) => write!(f, "unsupported image format: {msg}"),
            CartridgeError::Truncated {
                section,
                expected,
                found,
            } => write!(
                f,
                "{section} truncated: expected {expected} bytes, found {found}"
            ),
            CartridgeError::UnsupportedMapper(id) => write!(f, "unsupported mapper id: {id}"),
            CartridgeError::InvalidImage(msg) => write!(f, "invalid cartridge image: {msg}"),
            CartridgeError::Io(e) => write!(f, "failed to read cartridge image: {e}"),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CartridgeError {
    fn from(e: std::io::Error) -> Self {
        CartridgeError::Io(e)
    }
}

#[derive(Debug)]
pub struct Cartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    prg_ram: Vec<u8>,
    prg_banks: u8,
    chr_banks: u8,
    mapper: Box<dyn Mapper>,
    mirroring: Mirroring,
}

impl Cartridge {
    // -------------- Construction --------------

    /// Build a cartridge from raw memory arrays.
    ///
    /// - `prg` must hold at least `prg_banks` x 16 KiB.
    /// - `chr` must hold at least `chr_banks` x 8 KiB; with `chr_banks == 0`
    ///   the contents are ignored and 8 KiB of CHR RAM is allocated instead.
    pub fn new(
        prg: Vec<u8>,
        chr: Vec<u8>,
        mapper_id: u8,
        prg_banks: u8,
        chr_banks: u8,
        mirroring: Mirroring,
    ) -> Result<Self, CartridgeError> {
        if prg_banks == 0 {
            return Err(CartridgeError::InvalidImage("no PRG banks"));
        }
        let prg_len = prg_banks as usize * PRG_BANK_SIZE;
        if prg.len() < prg_len {
            return Err(CartridgeError::Truncated {
                section: "PRG ROM",
                expected: prg_len,
                found: prg.len(),
            });
        }

        let chr = if chr_banks == 0 {
            vec![0; CHR_BANK_SIZE]
        } else {
            let chr_len = chr_banks as usize * CHR_BANK_SIZE;
            if chr.len() < chr_len {
                return Err(CartridgeError::Truncated {
                    section: "CHR ROM",
                    expected: chr_len,
                    found: chr.len(),
                });
            }
            chr
        };

        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => Box::new(Nrom::new(prg_banks, chr_banks)),
            2 => Box::new(Uxrom::new(prg_banks, chr_banks)),
            _ => {
                warn!("rejecting cartridge with unsupported mapper {mapper_id}");
                return Err(CartridgeError::UnsupportedMapper(mapper_id));
            }
        };

        info!(
            "cartridge: mapper {mapper_id}, {prg_banks} PRG bank(s), {chr_banks} CHR bank(s), {mirroring:?} mirroring"
        );

        Ok(Self {
            prg,
            chr,
            prg_ram: vec![0; PRG_RAM_SIZE],
            prg_banks,
            chr_banks,
            mapper,
            mirroring,
        })
    }

    /// Load a cartridge from raw iNES (v1) bytes.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < INES_HEADER_LEN {
            return Err(CartridgeError::InvalidHeader("data too small for header"));
        }
        if &data[0..4] != b"NES\x1A" {
            return Err(CartridgeError::InvalidHeader("bad magic (expected NES<1A>)"));
        }

        let prg_banks = data[4];
        let chr_banks = data[5];
        let flags6 = data[6];
        let flags7 = data[7];

        if (flags7 & 0x0C) == 0x08 {
            return Err(CartridgeError::UnsupportedFormat("NES 2.0"));
        }

        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);
        let mirroring = if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = INES_HEADER_LEN;
        if flags6 & 0x04 != 0 {
            offset += INES_TRAINER_LEN;
        }

        let prg_len = prg_banks as usize * PRG_BANK_SIZE;
        let prg = section(data, offset, prg_len, "PRG ROM")?;
        offset += prg_len;

        let chr = if chr_banks == 0 {
            Vec::new()
        } else {
            section(data, offset, chr_banks as usize * CHR_BANK_SIZE, "CHR ROM")?
        };

        Self::new(prg, chr, mapper_id, prg_banks, chr_banks, mirroring)
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    // -------------- CPU / PPU entry points --------------

    /// CPU read. `None` means the cartridge does not own `addr`.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        if let 0x6000..=0x7FFF = addr {
            return Some(self.prg_ram[(addr & 0x1FFF) as usize]);
        }
        self.mapper
            .cpu_map_read(addr)
            .and_then(|offset| self.prg.get(offset).copied())
    }

    /// CPU write. Returns true if the cartridge claimed the address. PRG ROM
    /// is never modified; only PRG RAM and mapper registers change.
    pub fn cpu_write(&mut self, addr: u16, data: u8) -> bool {
        if let 0x6000..=0x7FFF = addr {
            self.prg_ram[(addr & 0x1FFF) as usize] = data;
            return true;
        }
        match self.mapper.cpu_map_write(addr, data) {
            MappedWrite::Unmapped => false,
            MappedWrite::Register => true,
        }
    }

    /// PPU read in pattern space.
    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        self.mapper
            .ppu_map_read(addr)
            .and_then(|offset| self.chr.get(offset).copied())
    }

    /// PPU write in pattern space (only succeeds for CHR RAM).
    pub fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self
            .mapper
            .ppu_map_write(addr)
            .and_then(|offset| self.chr.get_mut(offset))
        {
            Some(slot) => {
                *slot = data;
                true
            }
            None => false,
        }
    }

    /// Reset mapper bank state. Memory contents are kept.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }

    // -------------- Accessors --------------

    pub fn mapper_id(&self) -> u8 {
        self.mapper.mapper_id()
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn prg_banks(&self) -> u8 {
        self.prg_banks
    }

    pub fn chr_banks(&self) -> u8 {
        self.chr_banks
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_banks == 0
    }
}

fn section(
    data: &[u8],
    offset: usize,
    len: usize,
    name: &'static str,
) -> Result<Vec<u8>, CartridgeError> {
    data.get(offset..offset + len)
        .map(<[u8]>::to_vec)
        .ok_or(CartridgeError::Truncated {
            section: name,
            expected: len,
            found: data.len().saturating_sub(offset),
        })
}
