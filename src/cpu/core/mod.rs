/*!
core::Cpu - cycle-stepped 6502 CPU.

Design
======
- `Cpu` owns the register file plus a remaining-cycle counter for the
  instruction in flight. It holds no memory; every entry point borrows a
  `CpuBus` for the duration of the call.
- `clock()` advances exactly one CPU cycle. When no cycles remain it fetches,
  decodes and executes the next instruction in full, then charges its cycle
  cost up front. Subsequent clocks just count the cost down. Instruction side
  effects therefore land on the first cycle of the instruction.
- Cycle cost = base + page-cross extra (only when both the addressing mode
  signals a crossing and the operation is read-class) + branch extras.

Interrupts
==========
- `reset` takes 8 cycles and loads PC from $FFFC.
- `irq` is ignored while I is set; otherwise it pushes PC and status (B clear,
  U set), sets I and vectors through $FFFE. 7 cycles.
- `nmi` does the same unconditionally through $FFFA. 8 cycles.
Interrupt cycles are added to whatever remains of the current instruction.
*/

#[cfg(feature = "cpu_trace")]
use log::trace;

use crate::cpu::execute::{IRQ_VECTOR, execute};
use crate::cpu::state::{Registers, Status};
use crate::cpu::table::{Instruction, lookup};
use crate::cpu_bus::CpuBus;

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

const RESET_CYCLES: u8 = 8;
const IRQ_CYCLES: u8 = 7;
const NMI_CYCLES: u8 = 8;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    regs: Registers,
    /// Cycles left before the next instruction is fetched.
    remaining: u8,
    total_cycles: u64,
    instructions: u64,
    /// Last fetched opcode and its resolved effective address.
    opcode: u8,
    addr: u16,
}

impl Cpu {
    /// Construct a CPU with power-up register defaults. Call `reset` before
    /// clocking so PC is loaded from the reset vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset registers and load PC from the reset vector.
    pub fn reset<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.regs.pc = bus.cpu_read_word(RESET_VECTOR);
        self.opcode = 0;
        self.addr = 0;
        self.remaining = RESET_CYCLES;
    }

    /// Advance one CPU cycle. Returns true if this cycle began a new
    /// instruction.
    pub fn clock<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> bool {
        let started = self.remaining == 0;
        if started {
            self.step_instruction(bus);
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.total_cycles += 1;
        started
    }

    fn step_instruction<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        #[cfg(feature = "cpu_trace")]
        let before = self.regs;

        self.opcode = self.regs.fetch_u8(bus);
        let ins: &Instruction = lookup(self.opcode);

        let (addr, crossed) = ins.mode.resolve(&mut self.regs, bus);
        self.addr = addr;
        let branch_cycles = execute(ins.op, ins.mode, addr, &mut self.regs, bus);

        self.regs.status.insert(Status::UNUSED);
        self.instructions += 1;
        self.remaining =
            ins.cycles + (crossed && ins.op.page_penalty()) as u8 + branch_cycles;

        #[cfg(feature = "cpu_trace")]
        trace!(
            "{:04X}  {:02X}  {:<3}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            before.pc,
            self.opcode,
            ins.name,
            before.a,
            before.x,
            before.y,
            before.status.bits(),
            before.sp,
            self.total_cycles
        );
    }

    /// Maskable interrupt request.
    pub fn irq<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        if self.regs.flag(Status::IRQ_DISABLE) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
        self.remaining = self.remaining.saturating_add(IRQ_CYCLES);
    }

    /// Non-maskable interrupt.
    pub fn nmi<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        self.interrupt(bus, NMI_VECTOR);
        self.remaining = self.remaining.saturating_add(NMI_CYCLES);
    }

    fn interrupt<B: CpuBus + ?Sized>(&mut self, bus: &mut B, vector: u16) {
        let pc = self.regs.pc;
        self.regs.push_u16(bus, pc);
        let status = self.regs.status.for_push(false);
        self.regs.push_u8(bus, status);
        self.regs.set_flag(Status::IRQ_DISABLE, true);
        self.regs.pc = bus.cpu_read_word(vector);
    }

    /// True when the current instruction has no cycles left.
    pub fn complete(&self) -> bool {
        self.remaining == 0
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.regs.a
    }
    pub fn x(&self) -> u8 {
        self.regs.x
    }
    pub fn y(&self) -> u8 {
        self.regs.y
    }
    pub fn sp(&self) -> u8 {
        self.regs.sp
    }
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }
    pub fn status(&self) -> Status {
        self.regs.status
    }
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn set_a(&mut self, v: u8) {
        self.regs.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.regs.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.regs.y = v;
    }
    pub fn set_sp(&mut self, v: u8) {
        self.regs.sp = v;
    }
    pub fn set_pc(&mut self, v: u16) {
        self.regs.pc = v;
    }
    pub fn set_status(&mut self, v: Status) {
        self.regs.status = v | Status::UNUSED;
    }

    /// Cycles left in the instruction (or interrupt sequence) in flight.
    pub fn remaining_cycles(&self) -> u8 {
        self.remaining
    }

    /// Total cycles clocked since construction.
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Instructions started since construction.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Opcode of the most recently started instruction.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Effective address resolved by the most recent instruction.
    pub fn last_address(&self) -> u16 {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::flat_memory_with_program;

    fn setup(program: &[u8]) -> (Cpu, Box<[u8; 0x10000]>) {
        let mut mem = flat_memory_with_program(0x8000, program);
        let mut cpu = Cpu::new();
        cpu.reset(&mut *mem);
        (cpu, mem)
    }

    /// Clock through reset and return the cycle count of the next instruction.
    fn run_instruction(cpu: &mut Cpu, mem: &mut [u8; 0x10000]) -> u32 {
        while !cpu.complete() {
            cpu.clock(mem);
        }
        assert!(cpu.clock(mem), "expected an instruction to start");
        let mut cycles = 1;
        while !cpu.complete() {
            assert!(!cpu.clock(mem));
            cycles += 1;
        }
        cycles
    }

    #[test]
    fn reset_state() {
        let (cpu, _mem) = setup(&[0xEA]);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.status(), Status::UNUSED | Status::IRQ_DISABLE);
        assert_eq!(cpu.remaining_cycles(), 8);
        assert!(!cpu.complete());
    }

    #[test]
    fn reset_consumes_eight_cycles_before_first_fetch() {
        let (mut cpu, mut mem) = setup(&[0xEA]);
        for _ in 0..8 {
            assert!(!cpu.clock(&mut *mem));
        }
        assert!(cpu.clock(&mut *mem));
        assert_eq!(cpu.pc(), 0x8001);
    }

    #[test]
    fn lda_immediate_two_cycles() {
        let (mut cpu, mut mem) = setup(&[0xA9, 0x80]);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 2);
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.status().contains(Status::NEGATIVE));
    }

    #[test]
    fn page_cross_penalty_only_for_reads() {
        // LDX #$FF ; LDA $80F0,X (crosses) ; STA $80F0,X (never pays extra)
        let (mut cpu, mut mem) = setup(&[0xA2, 0xFF, 0xBD, 0xF0, 0x80, 0x9D, 0xF0, 0x02]);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 2);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 5);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 5);
    }

    #[test]
    fn branch_cycle_counts() {
        // BNE +2 (not taken, Z set by LDA #0) ; BEQ +0 (taken, same page)
        let (mut cpu, mut mem) = setup(&[0xA9, 0x00, 0xD0, 0x02, 0xF0, 0x00, 0xEA]);
        run_instruction(&mut cpu, &mut mem);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 2);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 3);
        assert_eq!(cpu.pc(), 0x8006);
    }

    #[test]
    fn branch_across_page_costs_four() {
        let mut program = vec![0xEA; 0x100];
        // At $80FD: BEQ +$10 -> target $810F (PC after operand is $80FF)
        program[0xFD] = 0xF0;
        program[0xFE] = 0x10;
        let (mut cpu, mut mem) = setup(&program);
        cpu.set_pc(0x80FD);
        cpu.set_status(Status::ZERO);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 4);
        assert_eq!(cpu.pc(), 0x810F);
    }

    #[test]
    fn undefined_opcode_is_a_fixed_cost_no_op() {
        let (mut cpu, mut mem) = setup(&[0x02, 0xEA]);
        let a = cpu.a();
        assert_eq!(run_instruction(&mut cpu, &mut mem), 2);
        assert_eq!(cpu.pc(), 0x8001);
        assert_eq!(cpu.a(), a);
    }

    #[test]
    fn multi_byte_nop_skips_operands() {
        // NOP $1234,X (3 bytes) ; NOP #$00 (2 bytes) ; NOP $00 (2 bytes)
        let (mut cpu, mut mem) = setup(&[0x1C, 0x34, 0x12, 0x80, 0x00, 0x04, 0x00]);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 4);
        assert_eq!(cpu.pc(), 0x8003);
        run_instruction(&mut cpu, &mut mem);
        assert_eq!(cpu.pc(), 0x8005);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 3);
        assert_eq!(cpu.pc(), 0x8007);
    }

    #[test]
    fn irq_is_masked_by_interrupt_disable() {
        let (mut cpu, mut mem) = setup(&[0xEA]);
        let sp = cpu.sp();
        cpu.irq(&mut *mem);
        assert_eq!(cpu.sp(), sp);
        assert_eq!(cpu.pc(), 0x8000);
    }

    #[test]
    fn irq_pushes_state_and_vectors() {
        let (mut cpu, mut mem) = setup(&[0x58, 0xEA]); // CLI
        mem[0xFFFE] = 0x00;
        mem[0xFFFF] = 0x90;
        run_instruction(&mut cpu, &mut mem);
        cpu.irq(&mut *mem);
        assert_eq!(cpu.pc(), 0x9000);
        assert_eq!(cpu.remaining_cycles(), 7);
        assert!(cpu.status().contains(Status::IRQ_DISABLE));
        assert_eq!(mem[0x01FD], 0x80);
        assert_eq!(mem[0x01FC], 0x01);
        let pushed = mem[0x01FB];
        assert_eq!(pushed & Status::BREAK.bits(), 0);
        assert_ne!(pushed & Status::UNUSED.bits(), 0);
    }

    #[test]
    fn nmi_ignores_interrupt_disable() {
        let (mut cpu, mut mem) = setup(&[0xEA]);
        mem[0xFFFA] = 0x00;
        mem[0xFFFB] = 0xA0;
        while !cpu.complete() {
            cpu.clock(&mut *mem);
        }
        cpu.nmi(&mut *mem);
        assert_eq!(cpu.pc(), 0xA000);
        assert_eq!(cpu.remaining_cycles(), 8);
        assert_eq!(cpu.sp(), 0xFA);
    }

    #[test]
    fn jmp_indirect_and_subroutine() {
        // JSR $8010 ; at $8010: RTS
        let mut program = vec![0xEA; 0x20];
        program[0..3].copy_from_slice(&[0x20, 0x10, 0x80]);
        program[0x10] = 0x60;
        let (mut cpu, mut mem) = setup(&program);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 6);
        assert_eq!(cpu.pc(), 0x8010);
        assert_eq!(run_instruction(&mut cpu, &mut mem), 6);
        assert_eq!(cpu.pc(), 0x8003);
    }

    #[test]
    fn total_cycles_counts_every_clock() {
        let (mut cpu, mut mem) = setup(&[0xEA, 0xEA]);
        for _ in 0..12 {
            cpu.clock(&mut *mem);
        }
        assert_eq!(cpu.total_cycles(), 12);
    }
}
