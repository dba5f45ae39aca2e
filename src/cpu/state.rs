/*!
state.rs - 6502 architectural state (registers + flags) and stack helpers.

Overview
========
`Registers` owns every architecturally visible register. It excludes
instruction decode, cycle accounting and memory; those live in `core`,
`table` and `execute`.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V U B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  U = UNUSED (always reads as 1)
  B = BREAK (only exists on the stack: PHP/BRK push it set, IRQ/NMI clear)
  D = DECIMAL (toggled by CLD/SED, no effect on arithmetic)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY

Stack
=====
The stack lives on page 0x0100. Push writes at 0x0100|SP then decrements,
pull increments then reads. SP wraps modulo 256 and never leaves the page.
*/

use bitflags::bitflags;

use crate::cpu_bus::CpuBus;

/// Base address of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

bitflags! {
    /// Processor status word.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY       = 0b0000_0001;
        const ZERO        = 0b0000_0010;
        const IRQ_DISABLE = 0b0000_0100;
        const DECIMAL     = 0b0000_1000;
        const BREAK       = 0b0001_0000;
        const UNUSED      = 0b0010_0000;
        const OVERFLOW    = 0b0100_0000;
        const NEGATIVE    = 0b1000_0000;
    }
}

impl Status {
    /// Value the status register holds after reset.
    pub const POWER_UP: Status = Status::UNUSED.union(Status::IRQ_DISABLE);

    /// Byte pushed by PHP/BRK (`brk == true`) or IRQ/NMI (`brk == false`).
    #[inline]
    pub fn for_push(self, brk: bool) -> u8 {
        let mut v = self | Status::UNUSED;
        v.set(Status::BREAK, brk);
        v.bits()
    }

    /// Status restored by PLP/RTI: B is ignored and U forced on.
    #[inline]
    pub fn from_pulled(byte: u8) -> Status {
        (Status::from_bits_retain(byte) - Status::BREAK) | Status::UNUSED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0x0000,
            status: Status::POWER_UP,
        }
    }
}

impl Registers {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    #[inline]
    pub fn flag(&self, f: Status) -> bool {
        self.status.contains(f)
    }

    /// Assign a flag. U is re-asserted on every write.
    #[inline]
    pub fn set_flag(&mut self, f: Status, on: bool) {
        self.status.set(f, on);
        self.status.insert(Status::UNUSED);
    }

    /// Update ZERO + NEGATIVE from a result byte.
    #[inline]
    pub fn update_zn(&mut self, result: u8) {
        self.set_flag(Status::ZERO, result == 0);
        self.set_flag(Status::NEGATIVE, result & 0x80 != 0);
    }

    #[inline]
    pub fn carry_in(&self) -> u8 {
        self.flag(Status::CARRY) as u8
    }

    // ---------------------------------------------------------------------
    // Instruction stream
    // ---------------------------------------------------------------------

    #[inline]
    pub fn fetch_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        let b = bus.cpu_read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        b
    }

    #[inline]
    pub fn fetch_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_u8(bus) as u16;
        let hi = self.fetch_u8(bus) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------

    #[inline]
    pub fn push_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B, value: u8) {
        bus.cpu_write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    #[inline]
    pub fn pop_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.cpu_read(STACK_BASE | self.sp as u16)
    }

    /// Push a word high byte first, so it pulls back low byte first.
    #[inline]
    pub fn push_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B, value: u16) {
        self.push_u8(bus, (value >> 8) as u8);
        self.push_u8(bus, value as u8);
    }

    #[inline]
    pub fn pop_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pop_u8(bus) as u16;
        let hi = self.pop_u8(bus) as u16;
        (hi << 8) | lo
    }
}
