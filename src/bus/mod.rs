#![doc = r#"
Bus module: the system board.

Overview
- `Bus` is the single owner of every component: CPU, PPU, 2 KiB RAM, the
  cartridge slot, two controllers and the OAM DMA controller. Nothing holds a
  reference back to the Bus.
- The CPU reaches memory through `CpuView`, a decode view built per cycle
  from the Bus's non-CPU fields. The PPU reaches the cartridge through the
  `PpuBus` trait implemented by the cartridge slot.

Modules and responsibilities
- cpu_interface: CPU-visible address decoder (`CpuView`).
- clock: master clock (`clock`, `run_frame`, `step_instruction`), 3:1 PPU/CPU
  ratio, NMI delivery and DMA stall.
- dma: OAM DMA controller (`DmaController`).
- ram: 2 KiB mirrored work RAM.
"#]

pub mod clock;
pub mod cpu_interface;
pub mod dma;
pub mod ram;

#[cfg(test)]
mod tests;

use log::info;

use crate::bus::cpu_interface::CpuView;
use crate::bus::dma::DmaController;
use crate::bus::ram::Ram;
use crate::cartridge::Cartridge;
use crate::controller::{Buttons, Controller};
use crate::cpu::Cpu;
use crate::cpu_bus::CpuBus;
use crate::ppu::{Frame, Ppu};

pub struct Bus {
    cpu: Cpu,
    ppu: Ppu,
    ram: Ram,
    cartridge: Option<Cartridge>,
    controllers: [Controller; 2],
    dma: DmaController,
    /// Page written to $4014 during the current CPU cycle.
    dma_request: Option<u8>,
    /// PPU dots since reset.
    system_clock: u64,
    /// CPU slots since reset, DMA stalls included.
    cpu_cycles: u64,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            ram: Ram::new(),
            cartridge: None,
            controllers: [Controller::new(), Controller::new()],
            dma: DmaController::new(),
            dma_request: None,
            system_clock: 0,
            cpu_cycles: 0,
        }
    }

    /// Place a cartridge in the slot, replacing (and returning) any previous one.
    /// Call `reset` afterwards so the CPU picks up the new reset vector.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) -> Option<Cartridge> {
        self.cartridge.replace(cartridge)
    }

    pub fn remove_cartridge(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    /// Reset the cartridge mapper, CPU and PPU; idle DMA; zero the clock.
    pub fn reset(&mut self) {
        if let Some(cart) = self.cartridge.as_mut() {
            cart.reset();
        }
        self.ppu.reset();
        self.dma.reset();
        self.dma_request = None;
        self.system_clock = 0;
        self.cpu_cycles = 0;

        let mut view = CpuView::from_parts(
            &mut self.ram,
            &mut self.ppu,
            &mut self.cartridge,
            &mut self.controllers,
            &mut self.dma_request,
        );
        self.cpu.reset(&mut view);

        info!(
            "bus reset: PC={:04X}, cartridge {}",
            self.cpu.pc(),
            match &self.cartridge {
                Some(cart) => format!("mapper {}", cart.mapper_id()),
                None => "absent".to_string(),
            }
        );
    }

    /// CPU-visible read with full side effects (PPU status, controller shift).
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        CpuView::from_parts(
            &mut self.ram,
            &mut self.ppu,
            &mut self.cartridge,
            &mut self.controllers,
            &mut self.dma_request,
        )
        .cpu_read(addr)
    }

    /// CPU-visible write. A $4014 write starts DMA as if the CPU had made it.
    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        CpuView::from_parts(
            &mut self.ram,
            &mut self.ppu,
            &mut self.cartridge,
            &mut self.controllers,
            &mut self.dma_request,
        )
        .cpu_write(addr, data);
        if let Some(page) = self.dma_request.take() {
            self.dma.start(page, self.cpu_cycles);
        }
    }

    /// Set the live button state for controller port 0 or 1.
    pub fn set_controller(&mut self, port: usize, buttons: Buttons) {
        self.controllers[port & 1].set_buttons(buttons);
    }

    pub fn controller(&self, port: usize) -> &Controller {
        &self.controllers[port & 1]
    }

    // Component accessors
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn frame(&self) -> &Frame {
        self.ppu.frame()
    }

    pub fn dma_active(&self) -> bool {
        self.dma.is_active()
    }

    pub fn system_clock(&self) -> u64 {
        self.system_clock
    }

    /// CPU cycles elapsed on the system clock. Unlike `Cpu::total_cycles`
    /// this keeps counting while DMA holds the CPU.
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    /// 128x128 debug view of pattern table `table` colored with `palette`.
    pub fn pattern_table(&self, table: u8, palette: u8) -> Vec<crate::ppu::Rgb> {
        self.ppu.pattern_table(&self.cartridge, table, palette)
    }
}
