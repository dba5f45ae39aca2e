/*!
Clock/timing orchestrator for the Bus.

One `clock()` is one PPU dot. Order of operations per call:
1. PPU advances one dot (may raise its NMI line).
2. A raised NMI line is taken and delivered to the CPU immediately, so an
   NMI raised at scanline 241 dot 1 is serviced before the next CPU cycle.
3. Every third call (system clock divisible by 3) the CPU slot runs: either
   one OAM DMA cycle or one CPU cycle. A $4014 write made during a CPU cycle
   starts the DMA controller right after that cycle. DMA alignment uses the
   Bus's slot counter, which keeps running while the CPU is stalled.
4. The system clock counter advances.
*/

use log::debug;

use crate::bus::Bus;
use crate::bus::cpu_interface::CpuView;

impl Bus {
    /// Advance the whole system by one PPU dot.
    pub fn clock(&mut self) {
        self.ppu.clock(&self.cartridge);

        if self.ppu.take_nmi() {
            debug!(
                "NMI at scanline {} dot {}, PC={:04X}",
                self.ppu.scanline(),
                self.ppu.dot(),
                self.cpu.pc()
            );
            let mut view = CpuView::from_parts(
                &mut self.ram,
                &mut self.ppu,
                &mut self.cartridge,
                &mut self.controllers,
                &mut self.dma_request,
            );
            self.cpu.nmi(&mut view);
        }

        if self.system_clock % 3 == 0 {
            self.cpu_slot();
        }

        self.system_clock += 1;
    }

    fn cpu_slot(&mut self) {
        self.cpu_cycles += 1;
        let mut view = CpuView::from_parts(
            &mut self.ram,
            &mut self.ppu,
            &mut self.cartridge,
            &mut self.controllers,
            &mut self.dma_request,
        );

        if self.dma.is_active() {
            self.dma.step_one_cycle(&mut view);
            return;
        }

        self.cpu.clock(&mut view);

        if let Some(page) = self.dma_request.take() {
            debug!("OAM DMA from ${:02X}00 at CPU cycle {}", page, self.cpu_cycles);
            self.dma.start(page, self.cpu_cycles);
        }
    }

    /// Clock until the PPU finishes a frame. The completion flag is consumed.
    pub fn run_frame(&mut self) {
        loop {
            self.clock();
            if self.ppu.take_frame_complete() {
                break;
            }
        }
    }

    /// Clock until the CPU starts its next instruction. Returns the number of
    /// PPU dots that took.
    pub fn step_instruction(&mut self) -> u64 {
        let start = self.system_clock;
        let instructions = self.cpu.instructions();
        while self.cpu.instructions() == instructions {
            self.clock();
        }
        self.system_clock - start
    }
}
