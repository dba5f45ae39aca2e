//! Shared test utilities: iNES image builders, flat CPU memory, a PPU-side
//! bus mock and a ready-to-run `Bus`.
//!
//! These helpers de-duplicate setup across the CPU, PPU, Bus and Cartridge
//! tests. They support just what the test suite needs.
//!
//! Notes on iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//! - bytes 9..15 = padding
//!
//! Vectors sit in the last 6 bytes of the last PRG bank.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::{Cartridge, Mirroring};
use crate::mapper::{CHR_BANK_SIZE, PRG_BANK_SIZE};
use crate::ppu_bus::PpuBus;

const HEADER_LEN: usize = 16;

/// Build a minimal iNES (v1) image. PRG is filled with 0xAA, CHR with 0xCC.
///
/// - `prg_16k`: number of 16 KiB PRG units
/// - `chr_8k`: number of 8 KiB CHR units (0 => CHR RAM)
/// - `flags6` / `flags7`: raw header flag bytes
/// - `prg_ram_8k`: PRG RAM size byte
/// - `trainer`: optional 512-byte trainer inserted after the header
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        HEADER_LEN
            + trainer.map_or(0, |t| t.len())
            + prg_16k * PRG_BANK_SIZE
            + chr_8k * CHR_BANK_SIZE,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }

    bytes.resize(bytes.len() + prg_16k * PRG_BANK_SIZE, 0xAA);
    bytes.resize(bytes.len() + chr_8k * CHR_BANK_SIZE, 0xCC);
    bytes
}

/// NROM-128 image with `prg` at $8000 and the given (reset, nmi, irq)
/// vectors, all defaulting to $8000. CHR is RAM.
pub fn build_nrom_with_prg(prg: &[u8], vectors: Option<(u16, u16, u16)>) -> Vec<u8> {
    assert!(prg.len() <= PRG_BANK_SIZE - 6, "program must fit below the vectors");
    let mut rom = build_ines(1, 0, 0, 0, 1, None);
    let bank = &mut rom[HEADER_LEN..HEADER_LEN + PRG_BANK_SIZE];
    bank.fill(0xEA);
    bank[..prg.len()].copy_from_slice(prg);
    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(bank, reset, nmi, irq);
    rom
}

/// UxROM image with `banks` PRG banks; every byte of bank `n` is `n`.
/// The fixed last bank holds a reset vector to $C000.
pub fn build_uxrom(banks: u8) -> Vec<u8> {
    let mut rom = build_ines(banks as usize, 0, 0x20, 0, 1, None);
    for n in 0..banks as usize {
        let start = HEADER_LEN + n * PRG_BANK_SIZE;
        rom[start..start + PRG_BANK_SIZE].fill(n as u8);
    }
    let last = HEADER_LEN + (banks as usize - 1) * PRG_BANK_SIZE;
    set_vectors_in_prg(&mut rom[last..last + PRG_BANK_SIZE], 0xC000, 0xC000, 0xC000);
    rom
}

/// Write NMI, RESET and IRQ vectors into the last 6 bytes of a PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = prg.len() - 6;
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// 64 KiB flat memory with `program` at `origin` and the reset vector
/// pointing at it.
pub fn flat_memory_with_program(origin: u16, program: &[u8]) -> Box<[u8; 0x10000]> {
    let mut mem = Box::new([0u8; 0x10000]);
    let start = origin as usize;
    mem[start..start + program.len()].copy_from_slice(program);
    write_le_u16(&mut mem[..], 0xFFFC, origin);
    mem
}

/// Bus with an NROM cartridge running `program` from $8000, already reset.
pub fn bus_with_program(program: &[u8]) -> Bus {
    bus_with_rom(&build_nrom_with_prg(program, None))
}

/// Bus with the given iNES image inserted and reset.
pub fn bus_with_rom(rom: &[u8]) -> Bus {
    let cart = Cartridge::from_ines_bytes(rom).expect("test image is valid");
    let mut bus = Bus::new();
    bus.insert_cartridge(cart);
    bus.reset();
    bus
}

/// PPU-side bus stand-in. By default it claims no pattern addresses (so the
/// PPU's internal tables are used) and reports horizontal mirroring.
#[derive(Debug)]
pub struct MockPpuBus {
    chr: Option<Vec<u8>>,
    mirroring: Mirroring,
}

impl Default for MockPpuBus {
    fn default() -> Self {
        Self {
            chr: None,
            mirroring: Mirroring::Horizontal,
        }
    }
}

impl MockPpuBus {
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Claim pattern space with 8 KiB of zeroed CHR RAM.
    pub fn enable_chr_ram(&mut self) {
        self.chr = Some(vec![0; CHR_BANK_SIZE]);
    }
}

impl PpuBus for MockPpuBus {
    fn ppu_read(&self, addr: u16) -> Option<u8> {
        match addr {
            0x0000..=0x1FFF => self.chr.as_ref().map(|chr| chr[addr as usize]),
            _ => None,
        }
    }

    fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match (addr, self.chr.as_mut()) {
            (0x0000..=0x1FFF, Some(chr)) => {
                chr[addr as usize] = data;
                true
            }
            _ => false,
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(&rom[4..9], &[2, 1, 0x01, 0x00, 1]);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_at_end_of_bank() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn nrom_program_lands_at_bank_start() {
        let rom = build_nrom_with_prg(&[0xA9, 0x01], None);
        assert_eq!(&rom[16..18], &[0xA9, 0x01]);
        assert_eq!(rom[18], 0xEA, "padding is NOP");
        assert_eq!(&rom[16 + 0x3FFC..16 + 0x3FFE], &[0x00, 0x80]);
    }

    #[test]
    fn uxrom_banks_are_tagged() {
        let rom = build_uxrom(4);
        assert_eq!(rom[6] >> 4, 2, "mapper id 2");
        assert_eq!(rom[16 + 2 * 16 * 1024], 2);
    }

    #[test]
    fn flat_memory_sets_reset_vector() {
        let mem = flat_memory_with_program(0x0600, &[0xEA]);
        assert_eq!(mem[0x0600], 0xEA);
        assert_eq!((mem[0xFFFC], mem[0xFFFD]), (0x00, 0x06));
    }
}
