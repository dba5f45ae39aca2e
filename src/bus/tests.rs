use crate::bus::Bus;
use crate::controller::Buttons;
use crate::cpu::Status;
use crate::test_utils::{
    build_nrom_with_prg, build_uxrom, bus_with_program, bus_with_rom,
};

const DOTS_PER_FRAME: u64 = 341 * 262;

#[test]
fn ram_mirroring() {
    let mut bus = Bus::new();
    bus.cpu_write(0x0001, 0xAA);
    assert_eq!(bus.cpu_read(0x0001), 0xAA);
    assert_eq!(bus.cpu_read(0x0801), 0xAA);
    assert_eq!(bus.cpu_read(0x1801), 0xAA);

    bus.cpu_write(0x1801, 0x55);
    assert_eq!(bus.cpu_read(0x0001), 0x55);
}

#[test]
fn reset_loads_vector_and_sets_flags() {
    let bus = bus_with_program(&[]);
    assert_eq!(bus.cpu().pc(), 0x8000);
    assert!(bus.cpu().status().contains(Status::IRQ_DISABLE | Status::UNUSED));
    assert_eq!(bus.cpu().sp(), 0xFD);
    assert_eq!(bus.system_clock(), 0);
}

#[test]
fn cpu_runs_at_one_third_of_ppu_rate() {
    let mut bus = bus_with_program(&[]);
    for _ in 0..300 {
        bus.clock();
    }
    assert_eq!(bus.cpu().total_cycles(), 100);
    assert_eq!(bus.system_clock(), 300);
}

#[test]
fn step_instruction_executes_program() {
    // LDA #$42; STA $0200
    let mut bus = bus_with_program(&[0xA9, 0x42, 0x8D, 0x00, 0x02]);
    let dots = bus.step_instruction();
    assert!(dots > 8 * 3, "reset cycles elapse first");
    assert_eq!(bus.cpu().a(), 0x42);
    bus.step_instruction();
    assert_eq!(bus.cpu_read(0x0200), 0x42);
}

#[test]
fn oam_dma_copies_page_and_stalls_cpu() {
    // LDA #$02; STA $4014; JMP $8005
    let mut bus = bus_with_program(&[0xA9, 0x02, 0x8D, 0x14, 0x40, 0x4C, 0x05, 0x80]);
    for i in 0..256u16 {
        bus.cpu_write(0x0200 + i, (i as u8) ^ 0x5A);
    }

    while !bus.dma_active() {
        bus.clock();
    }
    let instructions = bus.cpu().instructions();
    let cpu_cycles = bus.cpu().total_cycles();
    let parity = bus.cpu_cycles() & 1;

    let mut slots = 0;
    while bus.dma_active() {
        if bus.system_clock() % 3 == 0 {
            slots += 1;
        }
        bus.clock();
    }

    assert_eq!(slots, 513 + parity);
    assert_eq!(bus.cpu().instructions(), instructions, "CPU frozen during DMA");
    assert_eq!(bus.cpu().total_cycles(), cpu_cycles);
    for (i, &b) in bus.ppu().oam().iter().enumerate() {
        assert_eq!(b, (i as u8) ^ 0x5A, "OAM byte {i}");
    }
}

/// Clock through one transfer. Returns (CPU cycle it was requested on,
/// stalled CPU cycles).
fn run_dma(bus: &mut Bus) -> (u64, u64) {
    while !bus.dma_active() {
        bus.clock();
    }
    let start = bus.cpu_cycles();
    while bus.dma_active() {
        bus.clock();
    }
    (start, bus.cpu_cycles() - start)
}

#[test]
fn back_to_back_dma_keeps_global_alignment() {
    // LDA $00; LDA #$02; STA $4014; STA $4014; JMP $800A
    let mut bus = bus_with_program(&[
        0xA5, 0x00, 0xA9, 0x02, 0x8D, 0x14, 0x40, 0x8D, 0x14, 0x40, 0x4C, 0x0A, 0x80,
    ]);

    let (first, first_stall) = run_dma(&mut bus);
    let (second, second_stall) = run_dma(&mut bus);

    // 8 reset + 3 + 2 + first cycle of STA.
    assert_eq!(first, 14);
    assert_eq!(first_stall, 513);
    // The CPU was frozen for 513 cycles, then finished STA (3) and began
    // the next one.
    assert_eq!(second, 14 + 513 + 3 + 1);
    assert_eq!(second_stall, 514);

    // Both transfers issue their first read on the same cycle parity.
    let first_read = |start: u64| start + 1 + (start & 1);
    assert_eq!(first_read(first) & 1, first_read(second) & 1);
}

#[test]
fn nmi_fires_once_per_vblank() {
    // main: LDA #$80; STA $2000; JMP $8005
    // nmi:  INC $10; RTI  (at $8010)
    let mut program = vec![0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
    program.resize(0x10, 0xEA);
    program.extend_from_slice(&[0xE6, 0x10, 0x40]);
    let rom = build_nrom_with_prg(&program, Some((0x8000, 0x8010, 0x8000)));
    let mut bus = bus_with_rom(&rom);

    bus.run_frame();
    assert_eq!(bus.cpu_read(0x0010), 1);
    bus.run_frame();
    bus.run_frame();
    assert_eq!(bus.cpu_read(0x0010), 3);
}

#[test]
fn no_nmi_when_disabled() {
    let mut program = vec![0x4C, 0x00, 0x80];
    program.resize(0x10, 0xEA);
    program.extend_from_slice(&[0xE6, 0x10, 0x40]);
    let rom = build_nrom_with_prg(&program, Some((0x8000, 0x8010, 0x8000)));
    let mut bus = bus_with_rom(&rom);
    bus.run_frame();
    bus.run_frame();
    assert_eq!(bus.cpu_read(0x0010), 0);
}

#[test]
fn frame_length_without_rendering() {
    let mut bus = bus_with_program(&[]);
    bus.run_frame();
    let start = bus.system_clock();
    bus.run_frame();
    assert_eq!(bus.system_clock() - start, DOTS_PER_FRAME);
}

#[test]
fn controller_reads_through_bus() {
    let mut bus = Bus::new();
    bus.set_controller(0, Buttons::A | Buttons::START);
    bus.cpu_write(0x4016, 1);
    bus.cpu_write(0x4016, 0);
    let bits: Vec<u8> = (0..8).map(|_| bus.cpu_read(0x4016)).collect();
    assert_eq!(bits, vec![1, 0, 0, 1, 0, 0, 0, 0]);
    assert_eq!(bus.cpu_read(0x4016), 0, "empty after eight reads");
}

#[test]
fn controller_strobe_held_high_repeats_a() {
    let mut bus = Bus::new();
    bus.set_controller(0, Buttons::A);
    bus.cpu_write(0x4016, 1);
    for _ in 0..12 {
        assert_eq!(bus.cpu_read(0x4016), 1);
    }
}

#[test]
fn ppu_data_reaches_chr_ram() {
    let mut bus = bus_with_program(&[]);
    bus.cpu_write(0x2006, 0x00);
    bus.cpu_write(0x2006, 0x10);
    bus.cpu_write(0x2007, 0x99);
    let cart = bus.cartridge().expect("cartridge inserted");
    assert_eq!(cart.ppu_read(0x0010), Some(0x99));

    bus.cpu_write(0x2006, 0x00);
    bus.cpu_write(0x2006, 0x10);
    let _stale = bus.cpu_read(0x2007);
    assert_eq!(bus.cpu_read(0x2007), 0x99);
}

#[test]
fn prg_ram_is_read_write() {
    let mut bus = bus_with_program(&[]);
    bus.cpu_write(0x6000, 0x12);
    bus.cpu_write(0x7FFF, 0x34);
    assert_eq!(bus.cpu_read(0x6000), 0x12);
    assert_eq!(bus.cpu_read(0x7FFF), 0x34);
}

#[test]
fn uxrom_bank_switch_through_bus() {
    let mut bus = bus_with_rom(&build_uxrom(4));
    assert_eq!(bus.cpu().pc(), 0xC000);
    assert_eq!(bus.cpu_read(0x8000), 0);
    bus.cpu_write(0x8000, 2);
    assert_eq!(bus.cpu_read(0x8000), 2);
    assert_eq!(bus.cpu_read(0xC000), 3, "fixed last bank");
    bus.cpu_write(0xFFFF, 1);
    assert_eq!(bus.cpu_read(0xBFFF), 1);
}

#[test]
fn reset_idles_dma_and_restores_banks() {
    let mut bus = bus_with_rom(&build_uxrom(4));
    bus.cpu_write(0x8000, 3);
    bus.cpu_write(0x4014, 0x02);
    assert!(bus.dma_active());
    bus.cpu_mut().set_pc(0x1234);

    bus.reset();
    assert!(!bus.dma_active());
    assert_eq!(bus.cpu().pc(), 0xC000);
    assert_eq!(bus.cpu_read(0x8000), 0);
    assert_eq!(bus.system_clock(), 0);
    assert_eq!(bus.cpu_cycles(), 0);
}

#[test]
fn cartridge_swap_returns_previous() {
    let mut bus = bus_with_program(&[]);
    let uxrom = crate::cartridge::Cartridge::from_ines_bytes(&build_uxrom(2))
        .expect("valid image");
    let old = bus.insert_cartridge(uxrom).expect("previous cartridge");
    assert_eq!(old.mapper_id(), 0);
    assert_eq!(bus.cartridge().map(|c| c.mapper_id()), Some(2));
    assert!(bus.remove_cartridge().is_some());
    assert!(bus.cartridge().is_none());
}
