/*
UxROM (Mapper 2) implementation.

Characteristics:
- PRG: 16 KiB switchable bank at $8000-$BFFF, last 16 KiB bank fixed at $C000-$FFFF.
- CHR: Flat 8 KiB, usually RAM. Writable only when the cartridge has no CHR ROM.
- Mirroring: Determined solely by the cartridge (no dynamic control).

Bank Select:
- Any CPU write to $8000-$FFFF latches the low 4 bits of the value as the low bank.
- The latched value is reduced modulo the PRG bank count so translated offsets
  always land inside PRG memory.

Reset Behavior:
- Low bank = 0, high bank = last bank.
*/

use crate::mapper::{MappedWrite, Mapper, PRG_BANK_SIZE};

#[derive(Debug, Clone)]
pub struct Uxrom {
    prg_banks: u8,
    chr_banks: u8,
    bank_lo: u8,
    bank_hi: u8,
}

impl Uxrom {
    pub fn new(prg_banks: u8, chr_banks: u8) -> Self {
        let mut m = Self {
            prg_banks,
            chr_banks,
            bank_lo: 0,
            bank_hi: 0,
        };
        m.reset();
        m
    }

    /// Currently selected bank for $8000-$BFFF.
    pub fn low_bank(&self) -> u8 {
        self.bank_lo
    }

    /// Bank mapped at $C000-$FFFF.
    pub fn high_bank(&self) -> u8 {
        self.bank_hi
    }

    #[inline]
    fn offset(bank: u8, addr: u16) -> usize {
        bank as usize * PRG_BANK_SIZE + (addr & 0x3FFF) as usize
    }
}

impl Mapper for Uxrom {
    fn mapper_id(&self) -> u8 {
        2
    }

    fn cpu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x8000..=0xBFFF => Some(Self::offset(self.bank_lo, addr)),
            0xC000..=0xFFFF => Some(Self::offset(self.bank_hi, addr)),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> MappedWrite {
        match addr {
            0x8000..=0xFFFF => {
                self.bank_lo = (data & 0x0F) % self.prg_banks.max(1);
                MappedWrite::Register
            }
            _ => MappedWrite::Unmapped,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        (addr < 0x2000).then_some(addr as usize)
    }

    fn ppu_map_write(&self, addr: u16) -> Option<usize> {
        (addr < 0x2000 && self.chr_banks == 0).then_some(addr as usize)
    }

    fn reset(&mut self) {
        self.bank_lo = 0;
        self.bank_hi = self.prg_banks.saturating_sub(1);
    }
}
