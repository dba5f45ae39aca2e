#![doc = r#"
lunanes library crate.

A cycle-stepped emulator core for the NES: a 6502 CPU, a dot-clocked PPU and a
system Bus that keeps both in lock-step with a cartridge and its mapper. The
crate has no frontend; a host drives `Bus::clock` or `Bus::run_frame`, reads
`Bus::frame` and feeds button state through `Bus::set_controller`.

Modules:
- bus: single owner of every component; master clock, address decode, OAM DMA
- cartridge: PRG/CHR storage, iNES v1 loader, mirroring; constructs a Mapper
- controller: 8-button serial controller
- cpu: 6502 core (state + opcode table + addressing + execute)
- cpu_bus: trait the CPU uses for every memory access
- mapper: Mapper trait and NROM (mapper 0)
- mappers: UxROM (mapper 2)
- ppu: registers, scroll, background/sprite pipelines, frame buffer
- ppu_bus: trait the PPU uses to reach cartridge CHR and mirroring

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod cpu_bus;
pub mod mapper;
pub mod mappers;
pub mod ppu;
pub mod ppu_bus;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeError, Mirroring};
pub use controller::{Buttons, Controller};
pub use cpu::Cpu;
pub use cpu_bus::CpuBus;
pub use ppu::{Frame, Ppu};
pub use ppu_bus::PpuBus;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
