//! Image builders shared by the integration tests. Only the public crate API
//! is used here.

#![allow(dead_code)]

use lunanes::{Bus, Cartridge};

pub const PRG_BANK: usize = 16 * 1024;
pub const CHR_BANK: usize = 8 * 1024;

/// iNES v1 image with `prg` banks, `chr_banks` CHR banks (0 => CHR RAM) and
/// the given mapper id.
pub fn ines(prg: &[Vec<u8>], chr_banks: u8, mapper: u8, vertical: bool) -> Vec<u8> {
    let mut rom = vec![0u8; 16];
    rom[0..4].copy_from_slice(b"NES\x1A");
    rom[4] = prg.len() as u8;
    rom[5] = chr_banks;
    rom[6] = (mapper << 4) | u8::from(vertical);
    rom[7] = mapper & 0xF0;
    for bank in prg {
        assert_eq!(bank.len(), PRG_BANK);
        rom.extend_from_slice(bank);
    }
    rom.resize(rom.len() + chr_banks as usize * CHR_BANK, 0);
    rom
}

/// One NROM bank holding `program` at $8000 (mirrored at $C000), padded with
/// NOPs. Vectors are (reset, nmi, irq).
pub fn nrom(program: &[u8], vectors: (u16, u16, u16)) -> Vec<u8> {
    let mut bank = vec![0xEA; PRG_BANK];
    bank[..program.len()].copy_from_slice(program);
    set_vectors(&mut bank, vectors);
    ines(&[bank], 0, 0, false)
}

/// Write the NMI/RESET/IRQ vectors into the last six bytes of `bank`.
pub fn set_vectors(bank: &mut [u8], (reset, nmi, irq): (u16, u16, u16)) {
    let end = bank.len();
    bank[end - 6..end - 4].copy_from_slice(&nmi.to_le_bytes());
    bank[end - 4..end - 2].copy_from_slice(&reset.to_le_bytes());
    bank[end - 2..end].copy_from_slice(&irq.to_le_bytes());
}

/// Insert `rom` into a fresh Bus and reset it.
pub fn boot(rom: &[u8]) -> Bus {
    let cart = Cartridge::from_ines_bytes(rom).expect("image builds");
    let mut bus = Bus::new();
    assert!(bus.insert_cartridge(cart).is_none());
    bus.reset();
    bus
}
