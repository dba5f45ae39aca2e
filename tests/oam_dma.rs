mod common;

use common::{boot, nrom};

// Fill $0200-$02FF with 0..=255, DMA it to OAM, then read OAM[5] back
// through OAMADDR/OAMDATA into $10.
const PROGRAM: [u8; 27] = [
    0xA2, 0x00, // 8000 LDX #$00
    0x8A, // 8002 TXA
    0x9D, 0x00, 0x02, // 8003 STA $0200,X
    0xE8, // 8006 INX
    0xD0, 0xF9, // 8007 BNE $8002
    0xA9, 0x02, // 8009 LDA #$02
    0x8D, 0x14, 0x40, // 800B STA $4014
    0xA9, 0x05, // 800E LDA #$05
    0x8D, 0x03, 0x20, // 8010 STA $2003
    0xAD, 0x04, 0x20, // 8013 LDA $2004
    0x85, 0x10, // 8016 STA $10
    0x4C, 0x18, 0x80, // 8018 JMP $8018
];

#[test]
fn program_driven_dma_fills_oam() {
    let mut bus = boot(&nrom(&PROGRAM, (0x8000, 0x8000, 0x8000)));
    bus.run_frame();

    assert_eq!(bus.cpu().pc(), 0x8018);
    assert_eq!(bus.cpu_read(0x0010), 5);
    for (i, &b) in bus.ppu().oam().iter().enumerate() {
        assert_eq!(b, i as u8);
    }
}

#[test]
fn dma_stalls_the_cpu_for_513_or_514_cycles() {
    let mut bus = boot(&nrom(&PROGRAM, (0x8000, 0x8000, 0x8000)));
    while !bus.dma_active() {
        bus.clock();
    }
    let parity = bus.cpu_cycles() & 1;
    let pc = bus.cpu().pc();

    let start = bus.system_clock();
    while bus.dma_active() {
        bus.clock();
    }
    let dots = bus.system_clock() - start;

    // Three dots per stalled CPU cycle.
    let cycles = dots.div_ceil(3);
    assert_eq!(cycles, 513 + parity);
    assert_eq!(bus.cpu().pc(), pc, "no instruction ran during the transfer");
}
