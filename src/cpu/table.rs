/*!
table.rs - 256-entry opcode descriptor table.

Each opcode maps to an immutable `Instruction` record: mnemonic, operation,
addressing mode and base cycle count. The decoder never branches on the
opcode byte itself; everything it needs comes from this table.

Undefined opcodes never fault. They decode to `"???"` placeholders that burn
their documented cycle count. The multi-byte NOP family keeps its real
addressing mode so operand bytes are skipped and the stream stays aligned.
With the `undocumented_opcodes` feature the stable undocumented set (LAX,
SAX, DCP, ISB, SLO, RLA, SRE, RRA and SBC #imm at 0xEB) decodes to real
operations instead.
*/

use crate::cpu::addressing::AddrMode;
use crate::cpu::execute::Op;

/// One opcode descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub name: &'static str,
    pub op: Op,
    pub mode: AddrMode,
    pub cycles: u8,
}

impl Instruction {
    const fn new(name: &'static str, op: Op, mode: AddrMode, cycles: u8) -> Self {
        Self {
            name,
            op,
            mode,
            cycles,
        }
    }
}

macro_rules! ins {
    ($name:literal, $op:ident, $mode:ident, $cycles:literal) => {
        Instruction::new($name, Op::$op, AddrMode::$mode, $cycles)
    };
}

#[cfg(feature = "undocumented_opcodes")]
macro_rules! undoc {
    ($name:literal, $op:ident, $mode:ident, $cycles:literal) => {
        Instruction::new($name, Op::$op, AddrMode::$mode, $cycles)
    };
}

#[cfg(not(feature = "undocumented_opcodes"))]
macro_rules! undoc {
    ($name:literal, $op:ident, $mode:ident, $cycles:literal) => {
        Instruction::new("???", Op::Xxx, AddrMode::Imp, $cycles)
    };
}

/// Look up the descriptor for an opcode byte.
#[inline]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &INSTRUCTIONS[opcode as usize]
}

pub static INSTRUCTIONS: [Instruction; 256] = [
    // 0x00
    ins!("BRK", Brk, Imp, 7),
    ins!("ORA", Ora, Izx, 6),
    ins!("???", Xxx, Imp, 2),
    undoc!("SLO", Slo, Izx, 8),
    ins!("???", Nop, Zp0, 3),
    ins!("ORA", Ora, Zp0, 3),
    ins!("ASL", Asl, Zp0, 5),
    undoc!("SLO", Slo, Zp0, 5),
    ins!("PHP", Php, Imp, 3),
    ins!("ORA", Ora, Imm, 2),
    ins!("ASL", Asl, Acc, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("???", Nop, Abs, 4),
    ins!("ORA", Ora, Abs, 4),
    ins!("ASL", Asl, Abs, 6),
    undoc!("SLO", Slo, Abs, 6),
    // 0x10
    ins!("BPL", Bpl, Rel, 2),
    ins!("ORA", Ora, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("SLO", Slo, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("ORA", Ora, Zpx, 4),
    ins!("ASL", Asl, Zpx, 6),
    undoc!("SLO", Slo, Zpx, 6),
    ins!("CLC", Clc, Imp, 2),
    ins!("ORA", Ora, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("SLO", Slo, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("ORA", Ora, Abx, 4),
    ins!("ASL", Asl, Abx, 7),
    undoc!("SLO", Slo, Abx, 7),
    // 0x20
    ins!("JSR", Jsr, Abs, 6),
    ins!("AND", And, Izx, 6),
    ins!("???", Xxx, Imp, 2),
    undoc!("RLA", Rla, Izx, 8),
    ins!("BIT", Bit, Zp0, 3),
    ins!("AND", And, Zp0, 3),
    ins!("ROL", Rol, Zp0, 5),
    undoc!("RLA", Rla, Zp0, 5),
    ins!("PLP", Plp, Imp, 4),
    ins!("AND", And, Imm, 2),
    ins!("ROL", Rol, Acc, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("BIT", Bit, Abs, 4),
    ins!("AND", And, Abs, 4),
    ins!("ROL", Rol, Abs, 6),
    undoc!("RLA", Rla, Abs, 6),
    // 0x30
    ins!("BMI", Bmi, Rel, 2),
    ins!("AND", And, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("RLA", Rla, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("AND", And, Zpx, 4),
    ins!("ROL", Rol, Zpx, 6),
    undoc!("RLA", Rla, Zpx, 6),
    ins!("SEC", Sec, Imp, 2),
    ins!("AND", And, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("RLA", Rla, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("AND", And, Abx, 4),
    ins!("ROL", Rol, Abx, 7),
    undoc!("RLA", Rla, Abx, 7),
    // 0x40
    ins!("RTI", Rti, Imp, 6),
    ins!("EOR", Eor, Izx, 6),
    ins!("???", Xxx, Imp, 2),
    undoc!("SRE", Sre, Izx, 8),
    ins!("???", Nop, Zp0, 3),
    ins!("EOR", Eor, Zp0, 3),
    ins!("LSR", Lsr, Zp0, 5),
    undoc!("SRE", Sre, Zp0, 5),
    ins!("PHA", Pha, Imp, 3),
    ins!("EOR", Eor, Imm, 2),
    ins!("LSR", Lsr, Acc, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("JMP", Jmp, Abs, 3),
    ins!("EOR", Eor, Abs, 4),
    ins!("LSR", Lsr, Abs, 6),
    undoc!("SRE", Sre, Abs, 6),
    // 0x50
    ins!("BVC", Bvc, Rel, 2),
    ins!("EOR", Eor, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("SRE", Sre, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("EOR", Eor, Zpx, 4),
    ins!("LSR", Lsr, Zpx, 6),
    undoc!("SRE", Sre, Zpx, 6),
    ins!("CLI", Cli, Imp, 2),
    ins!("EOR", Eor, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("SRE", Sre, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("EOR", Eor, Abx, 4),
    ins!("LSR", Lsr, Abx, 7),
    undoc!("SRE", Sre, Abx, 7),
    // 0x60
    ins!("RTS", Rts, Imp, 6),
    ins!("ADC", Adc, Izx, 6),
    ins!("???", Xxx, Imp, 2),
    undoc!("RRA", Rra, Izx, 8),
    ins!("???", Nop, Zp0, 3),
    ins!("ADC", Adc, Zp0, 3),
    ins!("ROR", Ror, Zp0, 5),
    undoc!("RRA", Rra, Zp0, 5),
    ins!("PLA", Pla, Imp, 4),
    ins!("ADC", Adc, Imm, 2),
    ins!("ROR", Ror, Acc, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("JMP", Jmp, Ind, 5),
    ins!("ADC", Adc, Abs, 4),
    ins!("ROR", Ror, Abs, 6),
    undoc!("RRA", Rra, Abs, 6),
    // 0x70
    ins!("BVS", Bvs, Rel, 2),
    ins!("ADC", Adc, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("RRA", Rra, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("ADC", Adc, Zpx, 4),
    ins!("ROR", Ror, Zpx, 6),
    undoc!("RRA", Rra, Zpx, 6),
    ins!("SEI", Sei, Imp, 2),
    ins!("ADC", Adc, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("RRA", Rra, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("ADC", Adc, Abx, 4),
    ins!("ROR", Ror, Abx, 7),
    undoc!("RRA", Rra, Abx, 7),
    // 0x80
    ins!("???", Nop, Imm, 2),
    ins!("STA", Sta, Izx, 6),
    ins!("???", Nop, Imm, 2),
    undoc!("SAX", Sax, Izx, 6),
    ins!("STY", Sty, Zp0, 3),
    ins!("STA", Sta, Zp0, 3),
    ins!("STX", Stx, Zp0, 3),
    undoc!("SAX", Sax, Zp0, 3),
    ins!("DEY", Dey, Imp, 2),
    ins!("???", Nop, Imm, 2),
    ins!("TXA", Txa, Imp, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("STY", Sty, Abs, 4),
    ins!("STA", Sta, Abs, 4),
    ins!("STX", Stx, Abs, 4),
    undoc!("SAX", Sax, Abs, 4),
    // 0x90
    ins!("BCC", Bcc, Rel, 2),
    ins!("STA", Sta, Izy, 6),
    ins!("???", Xxx, Imp, 2),
    ins!("???", Xxx, Imp, 6),
    ins!("STY", Sty, Zpx, 4),
    ins!("STA", Sta, Zpx, 4),
    ins!("STX", Stx, Zpy, 4),
    undoc!("SAX", Sax, Zpy, 4),
    ins!("TYA", Tya, Imp, 2),
    ins!("STA", Sta, Aby, 5),
    ins!("TXS", Txs, Imp, 2),
    ins!("???", Xxx, Imp, 5),
    ins!("???", Xxx, Imp, 5),
    ins!("STA", Sta, Abx, 5),
    ins!("???", Xxx, Imp, 5),
    ins!("???", Xxx, Imp, 5),
    // 0xA0
    ins!("LDY", Ldy, Imm, 2),
    ins!("LDA", Lda, Izx, 6),
    ins!("LDX", Ldx, Imm, 2),
    undoc!("LAX", Lax, Izx, 6),
    ins!("LDY", Ldy, Zp0, 3),
    ins!("LDA", Lda, Zp0, 3),
    ins!("LDX", Ldx, Zp0, 3),
    undoc!("LAX", Lax, Zp0, 3),
    ins!("TAY", Tay, Imp, 2),
    ins!("LDA", Lda, Imm, 2),
    ins!("TAX", Tax, Imp, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("LDY", Ldy, Abs, 4),
    ins!("LDA", Lda, Abs, 4),
    ins!("LDX", Ldx, Abs, 4),
    undoc!("LAX", Lax, Abs, 4),
    // 0xB0
    ins!("BCS", Bcs, Rel, 2),
    ins!("LDA", Lda, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("LAX", Lax, Izy, 5),
    ins!("LDY", Ldy, Zpx, 4),
    ins!("LDA", Lda, Zpx, 4),
    ins!("LDX", Ldx, Zpy, 4),
    undoc!("LAX", Lax, Zpy, 4),
    ins!("CLV", Clv, Imp, 2),
    ins!("LDA", Lda, Aby, 4),
    ins!("TSX", Tsx, Imp, 2),
    ins!("???", Xxx, Imp, 4),
    ins!("LDY", Ldy, Abx, 4),
    ins!("LDA", Lda, Abx, 4),
    ins!("LDX", Ldx, Aby, 4),
    undoc!("LAX", Lax, Aby, 4),
    // 0xC0
    ins!("CPY", Cpy, Imm, 2),
    ins!("CMP", Cmp, Izx, 6),
    ins!("???", Nop, Imm, 2),
    undoc!("DCP", Dcp, Izx, 8),
    ins!("CPY", Cpy, Zp0, 3),
    ins!("CMP", Cmp, Zp0, 3),
    ins!("DEC", Dec, Zp0, 5),
    undoc!("DCP", Dcp, Zp0, 5),
    ins!("INY", Iny, Imp, 2),
    ins!("CMP", Cmp, Imm, 2),
    ins!("DEX", Dex, Imp, 2),
    ins!("???", Xxx, Imp, 2),
    ins!("CPY", Cpy, Abs, 4),
    ins!("CMP", Cmp, Abs, 4),
    ins!("DEC", Dec, Abs, 6),
    undoc!("DCP", Dcp, Abs, 6),
    // 0xD0
    ins!("BNE", Bne, Rel, 2),
    ins!("CMP", Cmp, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("DCP", Dcp, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("CMP", Cmp, Zpx, 4),
    ins!("DEC", Dec, Zpx, 6),
    undoc!("DCP", Dcp, Zpx, 6),
    ins!("CLD", Cld, Imp, 2),
    ins!("CMP", Cmp, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("DCP", Dcp, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("CMP", Cmp, Abx, 4),
    ins!("DEC", Dec, Abx, 7),
    undoc!("DCP", Dcp, Abx, 7),
    // 0xE0
    ins!("CPX", Cpx, Imm, 2),
    ins!("SBC", Sbc, Izx, 6),
    ins!("???", Nop, Imm, 2),
    undoc!("ISB", Isb, Izx, 8),
    ins!("CPX", Cpx, Zp0, 3),
    ins!("SBC", Sbc, Zp0, 3),
    ins!("INC", Inc, Zp0, 5),
    undoc!("ISB", Isb, Zp0, 5),
    ins!("INX", Inx, Imp, 2),
    ins!("SBC", Sbc, Imm, 2),
    ins!("NOP", Nop, Imp, 2),
    undoc!("SBC", Sbc, Imm, 2),
    ins!("CPX", Cpx, Abs, 4),
    ins!("SBC", Sbc, Abs, 4),
    ins!("INC", Inc, Abs, 6),
    undoc!("ISB", Isb, Abs, 6),
    // 0xF0
    ins!("BEQ", Beq, Rel, 2),
    ins!("SBC", Sbc, Izy, 5),
    ins!("???", Xxx, Imp, 2),
    undoc!("ISB", Isb, Izy, 8),
    ins!("???", Nop, Zpx, 4),
    ins!("SBC", Sbc, Zpx, 4),
    ins!("INC", Inc, Zpx, 6),
    undoc!("ISB", Isb, Zpx, 6),
    ins!("SED", Sed, Imp, 2),
    ins!("SBC", Sbc, Aby, 4),
    ins!("???", Nop, Imp, 2),
    undoc!("ISB", Isb, Aby, 7),
    ins!("???", Nop, Abx, 4),
    ins!("SBC", Sbc, Abx, 4),
    ins!("INC", Inc, Abx, 7),
    undoc!("ISB", Isb, Abx, 7),
];
