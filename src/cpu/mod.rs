/*!
cpu::mod - Public façade for the 6502 CPU core.

Layout:

```text
    state.rs      - Register file, `Status` flags, stack helpers.
    addressing.rs - Addressing mode enum & effective-address resolution.
    execute.rs    - Operation semantics (ALU, RMW, branches, stack).
    table.rs      - 256-entry opcode descriptor table.
    core/         - `Cpu`: per-cycle clocking, reset and interrupts.
```

Usage:
```rust
use lunanes::cpu::Cpu;

let mut mem = Box::new([0u8; 0x10000]);
mem[0xFFFD] = 0x80; // reset vector -> $8000
mem[0x8000] = 0xEA; // NOP

let mut cpu = Cpu::new();
cpu.reset(&mut *mem);
while !cpu.clock(&mut *mem) {}
assert_eq!(cpu.pc(), 0x8001);
```
*/

pub mod addressing;
pub mod core;
pub mod execute;
pub mod state;
pub mod table;

pub use crate::cpu::addressing::AddrMode;
pub use crate::cpu::core::Cpu;
pub use crate::cpu::execute::Op;
pub use crate::cpu::state::{Registers, Status};
pub use crate::cpu::table::{INSTRUCTIONS, Instruction};
