use crate::error::UnimplementedOpcode;
use crate::instruction::HalfRegister;
use crate::mem::MemoryLike;

use super::Cpu;
use super::CpuState;
use super::Cycles;
use super::Flags;

/// A flat 64 KiB address space with the given program at 0x0000.
fn load(code: &[u8]) -> Vec<u8> {
    let mut mem = vec![0; 0x10000];
    mem[..code.len()].copy_from_slice(code);
    mem
}

/// A CPU with every register holding a different value.
fn seeded_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    for (i, reg) in HalfRegister::ALL.into_iter().enumerate() {
        cpu.regs[reg] = 0x11 * (i as u8 + 1);
    }
    cpu.regs.sp = 0xFFFE;
    cpu
}

/// The operand bits used to select a register in the op code tables.
fn reg_bits(reg: HalfRegister) -> u8 {
    match reg {
        HalfRegister::B => 0,
        HalfRegister::C => 1,
        HalfRegister::D => 2,
        HalfRegister::E => 3,
        HalfRegister::H => 4,
        HalfRegister::L => 5,
        HalfRegister::A => 7,
    }
}

fn run(cpu: &mut Cpu, mem: &mut Vec<u8>, steps: usize) {
    for _ in 0..steps {
        cpu.step(mem).unwrap();
    }
}

#[test]
fn register_loads_only_touch_the_destination() {
    for dest in HalfRegister::ALL {
        for src in HalfRegister::ALL {
            let op = 0x40 | reg_bits(dest) << 3 | reg_bits(src);
            let mut mem = load(&[op]);
            let mut cpu = seeded_cpu();
            let mut expected = cpu.clone();
            expected.regs[dest] = cpu.regs[src];
            expected.regs.pc = 1;
            expected.regs.r = 1;
            let cycles = cpu.step(&mut mem).unwrap();
            assert_eq!(cycles, Cycles::from_m(1));
            expected.clock = cpu.clock;
            assert_eq!(cpu, expected, "LD {dest}, {src} (0x{op:0>2X})");
            assert_eq!(cpu.clock.m, 1);
        }
    }
}

#[test]
fn push_then_pop_restores() {
    let mut mem = load(&[
        0xC5, // PUSH BC
        0xD5, // PUSH DE
        0xE5, // PUSH HL
        0x01, 0x00, 0x00, // LD BC, 0
        0x11, 0x00, 0x00, // LD DE, 0
        0x21, 0x00, 0x00, // LD HL, 0
        0xE1, // POP HL
        0xD1, // POP DE
        0xC1, // POP BC
    ]);
    let mut cpu = seeded_cpu();
    let before = cpu.regs.clone();
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.sp, 0xFFFE - 6);
    // High byte is pushed first
    assert_eq!(mem[0xFFFD], before.b);
    assert_eq!(mem[0xFFFC], before.c);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.bc(), 0);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.bc(), before.bc());
    assert_eq!(cpu.regs.de(), before.de());
    assert_eq!(cpu.regs.hl(), before.hl());
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn pop_af_masks_flags() {
    let mut mem = load(&[0xF5, 0xC1, 0xF1]);
    mem[0xC000] = 0xFF;
    mem[0xC001] = 0x12;
    let mut cpu = seeded_cpu();
    cpu.regs.f = Flags::ZERO | Flags::CARRY;
    // PUSH AF, POP BC
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.b, cpu.regs.a);
    assert_eq!(cpu.regs.c, 0x90);
    // POP AF
    cpu.regs.sp = 0xC000;
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f.as_byte(), 0xF0);
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn jr_nz_with_zero_set_falls_through() {
    let mut mem = load(&[0x20, 0x05]);
    let mut cpu = seeded_cpu();
    cpu.flags_mut().insert(Flags::ZERO);
    let mut expected = cpu.clone();
    let cycles = cpu.step(&mut mem).unwrap();
    assert_eq!(cycles, Cycles::from_m(2));
    expected.regs.pc = 2;
    expected.regs.r = 1;
    expected.clock = cpu.clock;
    assert_eq!(cpu, expected);
}

#[test]
fn jr_nz_taken() {
    let mut mem = load(&[0x00, 0x20, 0xFD]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 1);
    let cycles = cpu.step(&mut mem).unwrap();
    assert_eq!(cycles, Cycles::from_m(3));
    // 0x0003 - 3
    assert_eq!(cpu.regs.pc, 0x0000);
}

#[test]
fn load_and_add_scenario() {
    // LD B, 5; LD A, 3; ADD A, B; NOP
    let mut mem = load(&[0x06, 0x05, 0x3E, 0x03, 0x80, 0x00]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 4);
    assert_eq!(cpu.regs.a, 8);
    assert_eq!(cpu.regs.b, 5);
    assert!(!cpu.zero_flag());
    assert!(!cpu.carry_flag());
    assert_eq!(cpu.regs.pc, 6);
    assert_eq!(cpu.clock.m, 2 + 2 + 1 + 1);
    assert_eq!(cpu.clock.t, 4 * cpu.clock.m);
}

#[test]
fn clock_accumulates() {
    // LD BC, 0x1234; JP 0x1000
    let mut mem = load(&[0x01, 0x34, 0x12, 0xC3, 0x00, 0x10]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.pc, 0x1000);
    assert_eq!(cpu.clock.m, 7);
    assert_eq!(cpu.clock.t, 28);
    assert_eq!(cpu.clock.last, Cycles::from_m(4));
}

#[test]
fn call_and_return() {
    let mut mem = load(&[0xCD, 0x00, 0x02]);
    mem[0x0200] = 0xC9;
    let mut cpu = Cpu::new();
    cpu.regs.sp = 0xFFFE;
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(6));
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(mem.read_word(0xFFFC), 0x0003);
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(4));
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn rst_jumps_to_vector() {
    let mut mem = load(&[0x00, 0xEF]);
    let mut cpu = Cpu::new();
    cpu.regs.sp = 0xFFFE;
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(mem.read_word(0xFFFC), 0x0002);
}

#[test]
fn prefixed_ops() {
    // SWAP (HL); BIT 7, A; RL C
    let mut mem = load(&[0xCB, 0x36, 0xCB, 0x7F, 0xCB, 0x11]);
    mem[0xC000] = 0xA5;
    let mut cpu = Cpu::new();
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x7F;
    cpu.regs.c = 0x80;
    cpu.flags_mut().insert(Flags::CARRY);

    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(4));
    assert_eq!(mem[0xC000], 0x5A);
    assert_eq!(cpu.regs.f, Flags::NONE);

    cpu.flags_mut().insert(Flags::CARRY);
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(2));
    assert!(cpu.zero_flag());
    assert!(cpu.half_carry_flag());
    assert!(!cpu.subtraction_flag());
    assert!(cpu.carry_flag());
    assert_eq!(cpu.regs.a, 0x7F);

    cpu.flags_mut().remove(Flags::CARRY);
    cpu.step(&mut mem).unwrap();
    assert_eq!(cpu.regs.c, 0x00);
    assert!(cpu.zero_flag());
    assert!(cpu.carry_flag());
    assert_eq!(cpu.regs.pc, 6);
}

#[test]
fn compare_leaves_a_alone() {
    let mut mem = load(&[0xFE, 0x03]);
    let mut cpu = Cpu::new();
    cpu.regs.a = 0x03;
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x03);
    assert!(cpu.zero_flag());
    assert!(cpu.subtraction_flag());
    assert!(!cpu.carry_flag());
}

#[test]
fn increment_pointer_keeps_carry() {
    let mut mem = load(&[0x34]);
    mem[0xC000] = 0xFF;
    let mut cpu = Cpu::new();
    cpu.regs.set_hl(0xC000);
    cpu.flags_mut().insert(Flags::CARRY);
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(3));
    assert_eq!(mem[0xC000], 0x00);
    assert!(cpu.zero_flag());
    assert!(cpu.half_carry_flag());
    assert!(cpu.carry_flag());
}

#[test]
fn store_and_increment_hl() {
    let mut mem = load(&[0x22, 0x32]);
    let mut cpu = Cpu::new();
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x42;
    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem[0xC000], 0x42);
    assert_eq!(cpu.regs.hl(), 0xC001);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(mem[0xC001], 0x42);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn load_through_hl_carries_and_wraps() {
    // LD A, (HL+); LD A, (HL-); LD A, (HL-); LD A, (HL+)
    let mut mem = load(&[0x2A, 0x3A, 0x3A, 0x2A]);
    mem[0xC0FF] = 0x11;
    mem[0xC100] = 0x22;
    mem[0xFFFF] = 0x33;
    let mut cpu = Cpu::new();
    cpu.regs.set_hl(0xC0FF);

    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x11);
    assert_eq!((cpu.regs.h, cpu.regs.l), (0xC1, 0x00));
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x22);
    assert_eq!((cpu.regs.h, cpu.regs.l), (0xC0, 0xFF));
    // Nothing was written
    assert_eq!(mem[0xC0FF], 0x11);
    assert_eq!(mem[0xC100], 0x22);

    cpu.regs.set_hl(0x0000);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x2A);
    assert_eq!(cpu.regs.hl(), 0xFFFF);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.a, 0x33);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.clock.m, 4 * 2);
}

#[test]
fn every_prefixed_op_code_runs() {
    for op in 0..=u8::MAX {
        let mut mem = load(&[0xCB, op]);
        let mut cpu = seeded_cpu();
        cpu.regs.set_hl(0xC000);
        let cycles = cpu.step(&mut mem).unwrap();
        assert!(cycles.m >= 2, "0xCB 0x{op:0>2X}");
        assert_eq!(cpu.regs.pc, 2);
    }
}

#[test]
fn sp_offset_into_hl() {
    let mut mem = load(&[0xF8, 0xFF]);
    let mut cpu = Cpu::new();
    cpu.regs.sp = 0x0001;
    cpu.flags_mut().insert(Flags::ZERO);
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(3));
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.sp, 0x0001);
    assert!(!cpu.zero_flag());
    assert!(cpu.half_carry_flag());
    assert!(cpu.carry_flag());
}

#[test]
fn interrupt_master_enable() {
    let mut mem = load(&[0xFB, 0xF3]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 1);
    assert!(cpu.regs.ime);
    run(&mut cpu, &mut mem, 1);
    assert!(!cpu.regs.ime);
}

#[test]
fn halt_stops_fetching() {
    let mut mem = load(&[0x76, 0x3C]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.state, CpuState::Halted);
    assert!(!cpu.is_running());
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(1));
    assert_eq!(cpu.regs.pc, 1);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.clock.m, 2);
}

#[test]
fn stop_and_djnz_share_an_op_code() {
    let mut mem = load(&[0x10, 0x00]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.state, CpuState::Stopped);
    assert_eq!(cpu.regs.pc, 2);

    let mut mem = load(&[0x10, 0xFE]);
    let mut cpu = Cpu::new();
    cpu.regs.b = 2;
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(3));
    assert_eq!(cpu.regs.b, 1);
    assert_eq!(cpu.regs.pc, 0);
    assert_eq!(cpu.step(&mut mem).unwrap(), Cycles::from_m(2));
    assert_eq!(cpu.regs.b, 0);
    assert_eq!(cpu.regs.pc, 2);
}

#[test]
fn unimplemented_op_code_is_reported() {
    let mut mem = load(&[0x00, 0xDD]);
    let mut cpu = Cpu::new();
    run(&mut cpu, &mut mem, 1);
    let err = cpu.step(&mut mem).unwrap_err();
    assert_eq!(
        err,
        UnimplementedOpcode {
            pc: 0x0001,
            opcode: 0xDD,
            prefixed: false,
        }
    );
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.clock.m, 2);
    assert_eq!(cpu.clock.last, Cycles::from_m(1));
}

#[test]
fn refresh_counter_wraps() {
    let mut mem = load(&[0x00, 0x00]);
    let mut cpu = Cpu::new();
    cpu.regs.r = 0x7E;
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.r, 0x7F);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.regs.r, 0x00);
}

#[test]
fn read_op_does_not_execute() {
    let mem = load(&[0x3C]);
    let cpu = Cpu::new();
    assert_eq!(cpu.read_op(&mem).to_string(), "INC A");
    assert_eq!(cpu.regs.pc, 0);
    assert_eq!(cpu.clock.m, 0);
}
