/*!
DmaController: cycle-stepped OAM DMA state machine.

Behavioral model
- A CPU write to $4014 requests a copy of page `$XX00-$XXFF` into OAM.
- The transfer starts with 1 alignment cycle when requested on an even CPU
  cycle, 2 on an odd one.
- Then 256 read/write pairs: read one byte through the CPU decode into the
  latch, write the latch to OAMDATA (which advances OAMADDR).
- Total stall: 513 or 514 CPU cycles. While active the Bus hands every CPU
  slot to the controller instead of the CPU.
*/

use crate::cpu_bus::CpuBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DmaPhase {
    Read,
    Write,
}

/// Sink for DMA bytes. Equivalent to a $2004 write.
pub trait OamWriter {
    fn write_oam_data(&mut self, value: u8);
}

#[derive(Debug, Clone)]
pub struct DmaController {
    active: bool,
    page: u8,
    offset: u8,
    phase: DmaPhase,
    latch: u8,
    /// Alignment cycles still to burn before the first read.
    align_cycles: u8,
    transferred: u16,
}

impl Default for DmaController {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaController {
    pub fn new() -> Self {
        Self {
            active: false,
            page: 0,
            offset: 0,
            phase: DmaPhase::Read,
            latch: 0,
            align_cycles: 0,
            transferred: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Begin a transfer from `page << 8`. `cpu_cycle` parity selects the
    /// alignment (even: 1 cycle, odd: 2).
    pub fn start(&mut self, page: u8, cpu_cycle: u64) {
        self.active = true;
        self.page = page;
        self.offset = 0;
        self.phase = DmaPhase::Read;
        self.latch = 0;
        self.align_cycles = 1 + (cpu_cycle & 1) as u8;
        self.transferred = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    /// CPU cycles left in the current transfer, alignment included.
    pub fn stall_remaining(&self) -> u32 {
        if !self.active {
            return 0;
        }
        let bytes_left = 256 - self.transferred as u32;
        let transfer = match self.phase {
            DmaPhase::Read => bytes_left * 2,
            DmaPhase::Write => bytes_left * 2 - 1,
        };
        self.align_cycles as u32 + transfer
    }

    /// Perform one CPU cycle of the transfer. Returns false when idle.
    pub fn step_one_cycle<M>(&mut self, mem: &mut M) -> bool
    where
        M: CpuBus + OamWriter + ?Sized,
    {
        if !self.active {
            return false;
        }

        if self.align_cycles > 0 {
            self.align_cycles -= 1;
            return true;
        }

        match self.phase {
            DmaPhase::Read => {
                let addr = u16::from_be_bytes([self.page, self.offset]);
                self.latch = mem.cpu_read(addr);
                self.phase = DmaPhase::Write;
            }
            DmaPhase::Write => {
                mem.write_oam_data(self.latch);
                self.offset = self.offset.wrapping_add(1);
                self.transferred += 1;
                self.phase = DmaPhase::Read;
                if self.transferred == 256 {
                    self.active = false;
                }
            }
        }
        true
    }
}
