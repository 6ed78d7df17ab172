use wisp::Config;
use wisp::Gameboy;
use wisp::mem::MemoryLike;

fn rom() -> Vec<u8> {
    let mut rom: Vec<u8> = (0..0x8000).map(|i| (i % 0xFD) as u8).collect();
    // JP 0x0100
    rom[0x0200..0x0203].copy_from_slice(&[0xC3, 0x00, 0x01]);
    // INC A
    rom[0x0100] = 0x3C;
    rom
}

fn booting() -> Gameboy {
    let config = Config {
        boot_overlay: true,
        ..Config::default()
    };
    Gameboy::new(rom(), config).unwrap()
}

#[test_log::test]
fn overlay_hides_the_first_page() {
    let gb = booting();
    assert!(gb.mem().in_bios());
    assert!((0..0x0100).all(|addr| gb.mem().read_byte(addr) == 0xFF));
    assert_eq!(gb.mem().read_byte(0x0100), 0x3C);
    assert_eq!(gb.mem().read_byte(0x0101), (0x0101 % 0xFD) as u8);
}

#[test_log::test]
fn overlay_lifts_when_pc_reaches_the_entry_point() {
    let mut gb = booting();
    gb.cpu_mut().regs.pc = 0x0200;
    gb.step().unwrap();
    assert_eq!(gb.cpu().regs.pc, 0x0100);
    assert!(!gb.mem().in_bios());
    assert_eq!(gb.mem().read_byte(0x0010), 0x10);

    // The overlay never comes back
    gb.cpu_mut().regs.pc = 0x0000;
    gb.step().unwrap();
    assert!(!gb.mem().in_bios());
    assert_eq!(gb.mem().read_byte(0x0000), 0x00);
}

#[test_log::test]
fn overlay_stays_for_other_addresses() {
    let mut gb = booting();
    // LD D, E
    gb.cpu_mut().regs.pc = 0x0150;
    gb.step().unwrap();
    assert!(gb.mem().in_bios());
}

#[test_log::test]
fn no_overlay_by_default() {
    let gb = Gameboy::new(rom(), Config::default()).unwrap();
    assert!(!gb.mem().in_bios());
    assert_eq!(gb.mem().read_byte(0x0000), 0x00);
    assert_eq!(gb.mem().read_byte(0x00FC), 0xFC);
}
