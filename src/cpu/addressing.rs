/*!
addressing.rs - 6502 addressing modes and effective-address resolution.

Overview
========
`AddrMode::resolve` consumes the operand bytes of the current instruction
(advancing PC) and yields the effective address plus a page-cross signal.
It never reads the operand value itself: operations fetch lazily so that
stores don't touch registers with read side effects.

Resolved address per mode
-------------------------
```text
    Imp, Acc  -> 0 (no memory operand)
    Imm       -> address of the immediate byte
    Rel       -> branch target (PC after operand + sign-extended offset)
    Ind       -> pointer target, with the page-wrap bug when the pointer's
                 low byte is 0xFF
    Izx, Izy  -> pointer read from zero page, high byte wrapping in page 0
```

Page-cross signal
-----------------
Only Abx, Aby and Izy can report a crossing: the high byte of the effective
address differs from the high byte of the unindexed base. Whether that costs
a cycle is decided by the operation, not here.
*/

use crate::cpu::state::Registers;
use crate::cpu_bus::CpuBus;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// Implied.
    Imp,
    /// Accumulator (shifts and rotates on A).
    Acc,
    Imm,
    Zp0,
    Zpx,
    Zpy,
    Rel,
    Abs,
    Abx,
    Aby,
    Ind,
    Izx,
    Izy,
}

impl AddrMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(self) -> u16 {
        match self {
            AddrMode::Imp | AddrMode::Acc => 0,
            AddrMode::Imm
            | AddrMode::Zp0
            | AddrMode::Zpx
            | AddrMode::Zpy
            | AddrMode::Rel
            | AddrMode::Izx
            | AddrMode::Izy => 1,
            AddrMode::Abs | AddrMode::Abx | AddrMode::Aby | AddrMode::Ind => 2,
        }
    }

    /// Consume operand bytes and return `(effective_address, page_crossed)`.
    pub(crate) fn resolve<B: CpuBus + ?Sized>(self, r: &mut Registers, bus: &mut B) -> (u16, bool) {
        match self {
            AddrMode::Imp | AddrMode::Acc => (0, false),
            AddrMode::Imm => {
                let addr = r.pc;
                r.pc = r.pc.wrapping_add(1);
                (addr, false)
            }
            AddrMode::Zp0 => (r.fetch_u8(bus) as u16, false),
            AddrMode::Zpx => (r.fetch_u8(bus).wrapping_add(r.x) as u16, false),
            AddrMode::Zpy => (r.fetch_u8(bus).wrapping_add(r.y) as u16, false),
            AddrMode::Rel => {
                let offset = r.fetch_u8(bus) as i8;
                (r.pc.wrapping_add(offset as u16), false)
            }
            AddrMode::Abs => (r.fetch_u16(bus), false),
            AddrMode::Abx => indexed(r.fetch_u16(bus), r.x),
            AddrMode::Aby => indexed(r.fetch_u16(bus), r.y),
            AddrMode::Ind => {
                let ptr = r.fetch_u16(bus);
                (read_word_indirect_bug(bus, ptr), false)
            }
            AddrMode::Izx => {
                let zp = r.fetch_u8(bus).wrapping_add(r.x);
                (read_word_zp(bus, zp), false)
            }
            AddrMode::Izy => {
                let zp = r.fetch_u8(bus);
                indexed(read_word_zp(bus, zp), r.y)
            }
        }
    }
}

#[inline]
fn indexed(base: u16, index: u8) -> (u16, bool) {
    let addr = base.wrapping_add(index as u16);
    (addr, crosses_page(base, addr))
}

#[inline]
pub(crate) fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Read a pointer from zero page; the high byte wraps to $00 after $FF.
#[inline]
pub(crate) fn read_word_zp<B: CpuBus + ?Sized>(bus: &mut B, base: u8) -> u16 {
    let lo = bus.cpu_read(base as u16) as u16;
    let hi = bus.cpu_read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) hardware bug: the high byte is fetched from the start of
/// the same page when the pointer's low byte is 0xFF.
#[inline]
pub(crate) fn read_word_indirect_bug<B: CpuBus + ?Sized>(bus: &mut B, ptr: u16) -> u16 {
    let lo = bus.cpu_read(ptr) as u16;
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.cpu_read(hi_addr) as u16;
    (hi << 8) | lo
}
