/*!
execute.rs - 6502 operation semantics (ALU, flags, stack, RMW, branches).

`execute` runs one operation against an already-resolved effective address.
Operand values are fetched lazily (`Operand::load`) so store-class operations
never issue a read. Read-modify-write operations write back to A when the
addressing mode is `Acc`, otherwise to memory.

Cycle accounting
----------------
- `Op::page_penalty` marks read-class operations. The decoder charges the
  addressing mode's page-cross cycle only when it is set.
- `execute` returns extra cycles the operation itself incurred: a taken
  branch costs 1, plus 1 more when the target lies on another page.
*/

use crate::cpu::addressing::{AddrMode, crosses_page};
use crate::cpu::state::{Registers, Status};
use crate::cpu_bus::CpuBus;

/// IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undefined opcode placeholder.
    Xxx,
    #[cfg(feature = "undocumented_opcodes")]
    Lax,
    #[cfg(feature = "undocumented_opcodes")]
    Sax,
    #[cfg(feature = "undocumented_opcodes")]
    Dcp,
    #[cfg(feature = "undocumented_opcodes")]
    Isb,
    #[cfg(feature = "undocumented_opcodes")]
    Slo,
    #[cfg(feature = "undocumented_opcodes")]
    Rla,
    #[cfg(feature = "undocumented_opcodes")]
    Sre,
    #[cfg(feature = "undocumented_opcodes")]
    Rra,
}

impl Op {
    /// True for read-class operations that pay the page-cross cycle.
    pub fn page_penalty(self) -> bool {
        match self {
            Op::Adc
            | Op::And
            | Op::Cmp
            | Op::Eor
            | Op::Lda
            | Op::Ldx
            | Op::Ldy
            | Op::Nop
            | Op::Ora
            | Op::Sbc => true,
            #[cfg(feature = "undocumented_opcodes")]
            Op::Lax => true,
            _ => false,
        }
    }
}

/// Effective operand of the current instruction.
struct Operand {
    mode: AddrMode,
    addr: u16,
}

impl Operand {
    fn load<B: CpuBus + ?Sized>(&self, r: &Registers, bus: &mut B) -> u8 {
        match self.mode {
            AddrMode::Acc => r.a,
            _ => bus.cpu_read(self.addr),
        }
    }

    fn store<B: CpuBus + ?Sized>(&self, r: &mut Registers, bus: &mut B, value: u8) {
        match self.mode {
            AddrMode::Acc => r.a = value,
            _ => bus.cpu_write(self.addr, value),
        }
    }

    /// Read, transform, write back. Returns the new value.
    fn modify<B: CpuBus + ?Sized>(
        &self,
        r: &mut Registers,
        bus: &mut B,
        f: impl FnOnce(&mut Registers, u8) -> u8,
    ) -> u8 {
        let v = self.load(r, bus);
        let out = f(r, v);
        self.store(r, bus, out);
        out
    }
}

/// Execute `op` against the resolved `addr`. Returns extra cycles incurred by
/// the operation itself (branches only).
pub(crate) fn execute<B: CpuBus + ?Sized>(
    op: Op,
    mode: AddrMode,
    addr: u16,
    r: &mut Registers,
    bus: &mut B,
) -> u8 {
    let operand = Operand { mode, addr };
    match op {
        // ---------------- Loads / stores ----------------
        Op::Lda => {
            r.a = operand.load(r, bus);
            r.update_zn(r.a);
        }
        Op::Ldx => {
            r.x = operand.load(r, bus);
            r.update_zn(r.x);
        }
        Op::Ldy => {
            r.y = operand.load(r, bus);
            r.update_zn(r.y);
        }
        Op::Sta => bus.cpu_write(addr, r.a),
        Op::Stx => bus.cpu_write(addr, r.x),
        Op::Sty => bus.cpu_write(addr, r.y),

        // ---------------- Transfers ----------------
        Op::Tax => {
            r.x = r.a;
            r.update_zn(r.x);
        }
        Op::Tay => {
            r.y = r.a;
            r.update_zn(r.y);
        }
        Op::Txa => {
            r.a = r.x;
            r.update_zn(r.a);
        }
        Op::Tya => {
            r.a = r.y;
            r.update_zn(r.a);
        }
        Op::Tsx => {
            r.x = r.sp;
            r.update_zn(r.x);
        }
        Op::Txs => r.sp = r.x,

        // ---------------- Stack ----------------
        Op::Pha => r.push_u8(bus, r.a),
        Op::Php => r.push_u8(bus, r.status.for_push(true)),
        Op::Pla => {
            r.a = r.pop_u8(bus);
            r.update_zn(r.a);
        }
        Op::Plp => r.status = Status::from_pulled(r.pop_u8(bus)),

        // ---------------- Logic / arithmetic ----------------
        Op::And => {
            let v = operand.load(r, bus);
            r.a &= v;
            r.update_zn(r.a);
        }
        Op::Ora => {
            let v = operand.load(r, bus);
            r.a |= v;
            r.update_zn(r.a);
        }
        Op::Eor => {
            let v = operand.load(r, bus);
            r.a ^= v;
            r.update_zn(r.a);
        }
        Op::Bit => {
            let v = operand.load(r, bus);
            r.set_flag(Status::ZERO, r.a & v == 0);
            r.set_flag(Status::NEGATIVE, v & 0x80 != 0);
            r.set_flag(Status::OVERFLOW, v & 0x40 != 0);
        }
        Op::Adc => {
            let v = operand.load(r, bus);
            adc(r, v);
        }
        Op::Sbc => {
            let v = operand.load(r, bus);
            adc(r, v ^ 0xFF);
        }
        Op::Cmp => {
            let v = operand.load(r, bus);
            let reg = r.a;
            compare(r, reg, v);
        }
        Op::Cpx => {
            let v = operand.load(r, bus);
            let reg = r.x;
            compare(r, reg, v);
        }
        Op::Cpy => {
            let v = operand.load(r, bus);
            let reg = r.y;
            compare(r, reg, v);
        }

        // ---------------- Increments ----------------
        Op::Inc => {
            let v = operand.modify(r, bus, |_, v| v.wrapping_add(1));
            r.update_zn(v);
        }
        Op::Dec => {
            let v = operand.modify(r, bus, |_, v| v.wrapping_sub(1));
            r.update_zn(v);
        }
        Op::Inx => {
            r.x = r.x.wrapping_add(1);
            r.update_zn(r.x);
        }
        Op::Iny => {
            r.y = r.y.wrapping_add(1);
            r.update_zn(r.y);
        }
        Op::Dex => {
            r.x = r.x.wrapping_sub(1);
            r.update_zn(r.x);
        }
        Op::Dey => {
            r.y = r.y.wrapping_sub(1);
            r.update_zn(r.y);
        }

        // ---------------- Shifts / rotates ----------------
        Op::Asl => {
            let v = operand.modify(r, bus, asl);
            r.update_zn(v);
        }
        Op::Lsr => {
            let v = operand.modify(r, bus, lsr);
            r.update_zn(v);
        }
        Op::Rol => {
            let v = operand.modify(r, bus, rol);
            r.update_zn(v);
        }
        Op::Ror => {
            let v = operand.modify(r, bus, ror);
            r.update_zn(v);
        }

        // ---------------- Flags ----------------
        Op::Clc => r.set_flag(Status::CARRY, false),
        Op::Cld => r.set_flag(Status::DECIMAL, false),
        Op::Cli => r.set_flag(Status::IRQ_DISABLE, false),
        Op::Clv => r.set_flag(Status::OVERFLOW, false),
        Op::Sec => r.set_flag(Status::CARRY, true),
        Op::Sed => r.set_flag(Status::DECIMAL, true),
        Op::Sei => r.set_flag(Status::IRQ_DISABLE, true),

        // ---------------- Branches ----------------
        Op::Bcc => return branch(r, addr, Status::CARRY, false),
        Op::Bcs => return branch(r, addr, Status::CARRY, true),
        Op::Bne => return branch(r, addr, Status::ZERO, false),
        Op::Beq => return branch(r, addr, Status::ZERO, true),
        Op::Bpl => return branch(r, addr, Status::NEGATIVE, false),
        Op::Bmi => return branch(r, addr, Status::NEGATIVE, true),
        Op::Bvc => return branch(r, addr, Status::OVERFLOW, false),
        Op::Bvs => return branch(r, addr, Status::OVERFLOW, true),

        // ---------------- Control flow ----------------
        Op::Jmp => r.pc = addr,
        Op::Jsr => {
            r.push_u16(bus, r.pc.wrapping_sub(1));
            r.pc = addr;
        }
        Op::Rts => r.pc = r.pop_u16(bus).wrapping_add(1),
        Op::Rti => {
            r.status = Status::from_pulled(r.pop_u8(bus));
            r.pc = r.pop_u16(bus);
        }
        Op::Brk => {
            // Skip the padding byte after BRK.
            r.pc = r.pc.wrapping_add(1);
            r.push_u16(bus, r.pc);
            r.push_u8(bus, r.status.for_push(true));
            r.set_flag(Status::IRQ_DISABLE, true);
            r.pc = bus.cpu_read_word(IRQ_VECTOR);
        }

        Op::Nop | Op::Xxx => {}

        // ---------------- Undocumented ----------------
        #[cfg(feature = "undocumented_opcodes")]
        Op::Lax => {
            let v = operand.load(r, bus);
            r.a = v;
            r.x = v;
            r.update_zn(v);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Sax => bus.cpu_write(addr, r.a & r.x),
        #[cfg(feature = "undocumented_opcodes")]
        Op::Dcp => {
            let v = operand.modify(r, bus, |_, v| v.wrapping_sub(1));
            let reg = r.a;
            compare(r, reg, v);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Isb => {
            let v = operand.modify(r, bus, |_, v| v.wrapping_add(1));
            adc(r, v ^ 0xFF);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Slo => {
            let v = operand.modify(r, bus, asl);
            r.a |= v;
            r.update_zn(r.a);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Rla => {
            let v = operand.modify(r, bus, rol);
            r.a &= v;
            r.update_zn(r.a);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Sre => {
            let v = operand.modify(r, bus, lsr);
            r.a ^= v;
            r.update_zn(r.a);
        }
        #[cfg(feature = "undocumented_opcodes")]
        Op::Rra => {
            let v = operand.modify(r, bus, ror);
            adc(r, v);
        }
    }
    0
}

// ---------------------------------------------------------------------------
// ALU helpers
// ---------------------------------------------------------------------------

/// Binary add with carry. SBC feeds the one's complement of its operand.
pub(crate) fn adc(r: &mut Registers, v: u8) {
    let a = r.a;
    let sum = a as u16 + v as u16 + r.carry_in() as u16;
    let result = sum as u8;
    r.set_flag(Status::CARRY, sum > 0xFF);
    r.set_flag(Status::OVERFLOW, (!(a ^ v) & (a ^ result) & 0x80) != 0);
    r.a = result;
    r.update_zn(result);
}

fn compare(r: &mut Registers, reg: u8, v: u8) {
    r.set_flag(Status::CARRY, reg >= v);
    r.update_zn(reg.wrapping_sub(v));
}

fn asl(r: &mut Registers, v: u8) -> u8 {
    r.set_flag(Status::CARRY, v & 0x80 != 0);
    v << 1
}

fn lsr(r: &mut Registers, v: u8) -> u8 {
    r.set_flag(Status::CARRY, v & 0x01 != 0);
    v >> 1
}

fn rol(r: &mut Registers, v: u8) -> u8 {
    let carry = r.carry_in();
    r.set_flag(Status::CARRY, v & 0x80 != 0);
    (v << 1) | carry
}

fn ror(r: &mut Registers, v: u8) -> u8 {
    let carry = r.carry_in();
    r.set_flag(Status::CARRY, v & 0x01 != 0);
    (v >> 1) | (carry << 7)
}

/// Branch when `flag` equals `when`. Taken: 1 cycle, plus 1 if the target is
/// on a different page.
fn branch(r: &mut Registers, target: u16, flag: Status, when: bool) -> u8 {
    if r.flag(flag) != when {
        return 0;
    }
    let extra = 1 + crosses_page(r.pc, target) as u8;
    r.pc = target;
    extra
}
