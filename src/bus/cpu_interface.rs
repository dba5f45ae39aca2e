/*!
CPU interface dispatcher

`CpuView` is a short-lived decode view over every Bus field except the CPU.
The Bus builds one per CPU cycle (or DMA cycle) and hands it to the CPU as its
`CpuBus`, which keeps the CPU free of back-references to the Bus.

Address map:
- cartridge first: PRG RAM $6000-$7FFF, PRG ROM/mapper registers $8000-$FFFF
- $0000-$1FFF: 2 KiB internal RAM, mirrored (& 0x07FF)
- $2000-$3FFF: PPU registers, mirrored every 8 bytes (& 0x0007)
- $4014: OAM DMA request (write)
- $4016/$4017: controller ports (reads); a $4016 write strobes both ports
- everything else reads 0 and ignores writes
*/

use crate::bus::dma::OamWriter;
use crate::bus::ram::Ram;
use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::cpu_bus::CpuBus;
use crate::ppu::Ppu;

/// OAM DMA trigger register.
pub const OAM_DMA: u16 = 0x4014;
/// Controller port 1 (read) / strobe (write).
pub const JOY1: u16 = 0x4016;
/// Controller port 2 (read only; writes belong to the APU frame counter).
pub const JOY2: u16 = 0x4017;

pub(in crate::bus) struct CpuView<'a> {
    ram: &'a mut Ram,
    ppu: &'a mut Ppu,
    cartridge: &'a mut Option<Cartridge>,
    controllers: &'a mut [Controller; 2],
    dma_request: &'a mut Option<u8>,
}

impl<'a> CpuView<'a> {
    #[inline]
    pub(in crate::bus) fn from_parts(
        ram: &'a mut Ram,
        ppu: &'a mut Ppu,
        cartridge: &'a mut Option<Cartridge>,
        controllers: &'a mut [Controller; 2],
        dma_request: &'a mut Option<u8>,
    ) -> Self {
        Self {
            ram,
            ppu,
            cartridge,
            controllers,
            dma_request,
        }
    }
}

impl CpuBus for CpuView<'_> {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        if let Some(data) = self.cartridge.as_ref().and_then(|cart| cart.cpu_read(addr)) {
            return data;
        }
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x2000..=0x3FFF => self.ppu.cpu_read(addr, &*self.cartridge),
            JOY1 | JOY2 => self.controllers[(addr & 1) as usize].read(),
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        if let Some(cart) = self.cartridge.as_mut() {
            if cart.cpu_write(addr, data) {
                return;
            }
        }
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, data),
            0x2000..=0x3FFF => self.ppu.cpu_write(addr, data, &mut *self.cartridge),
            OAM_DMA => *self.dma_request = Some(data),
            JOY1 => self.controllers.iter_mut().for_each(|c| c.write(data)),
            _ => {}
        }
    }
}

impl OamWriter for CpuView<'_> {
    #[inline]
    fn write_oam_data(&mut self, value: u8) {
        self.ppu.write_oam_data(value);
    }
}
