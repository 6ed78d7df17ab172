use std::borrow::Cow;

use tracing::warn;

use crate::config::Config;
use crate::config::UnimplementedPolicy;
use crate::cpu::Cpu;
use crate::cpu::Cycles;
use crate::error::InvalidRom;
use crate::error::UnimplementedOpcode;
use crate::mem::MemoryBus;
use crate::ppu::Frame;
use crate::ppu::Ppu;

/// This is the core emulation primative. It contains the entire state machine of the emulated
/// handheld and is agnostic to usecase and how it is rendered (if at all). Notably, the `Gameboy`
/// does not provide a `run` or analogous method. It must be stepped forward.
///
/// This allows managing tick rate, processing IO, and more to be done externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gameboy {
    cpu: Cpu,
    mem: MemoryBus,
    ppu: Ppu,
    config: Config,
    faults: u64,
}

/// What happened during a single call to [`Gameboy::step`].
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub struct StepOutcome {
    pub cycles: Cycles,
    /// Set when the PPU entered VBlank during this step. The frame is ready to be presented.
    pub frame_completed: bool,
}

impl Gameboy {
    /// Takes the bytes of a ROM image and uses it to construct a powered-on handheld.
    pub fn new<'a>(rom: impl Into<Cow<'a, [u8]>>, config: Config) -> Result<Self, InvalidRom> {
        let mem = MemoryBus::new(rom)?.with_boot_overlay(config.boot_overlay);
        Ok(Self {
            cpu: Cpu::new(),
            mem,
            ppu: Ppu::new(),
            config,
            faults: 0,
        })
    }

    /// Runs a single instruction and forwards the cycles it took to the PPU.
    ///
    /// An unimplemented op code is handled according to the config. Under
    /// [`UnimplementedPolicy::Halt`], the CPU halts and the fault is returned (the PPU still sees
    /// the time that passed). Under [`UnimplementedPolicy::Skip`], the fault is logged, counted, and
    /// the step succeeds.
    pub fn step(&mut self) -> Result<StepOutcome, UnimplementedOpcode> {
        let result = self.cpu.step(&mut self.mem);
        let cycles = self.cpu.clock.last;
        let frame_completed = self.ppu.step(cycles.t, &self.mem);
        match result {
            Ok(_) => {}
            Err(err) => match self.config.unimplemented_opcode {
                UnimplementedPolicy::Halt => {
                    self.cpu.halt();
                    return Err(err);
                }
                UnimplementedPolicy::Skip => {
                    warn!("Skipping: {err}");
                    self.faults += 1;
                }
            },
        }
        Ok(StepOutcome {
            cycles,
            frame_completed,
        })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn mem(&self) -> &MemoryBus {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut MemoryBus {
        &mut self.mem
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    /// The last frame the PPU drew.
    pub fn frame(&self) -> &Frame {
        self.ppu.frame()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of unimplemented op codes that have been skipped over.
    pub fn faults(&self) -> u64 {
        self.faults
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::CpuState;
    use crate::mem::MemoryLike;

    use super::*;

    fn rom(code: &[u8]) -> Vec<u8> {
        let mut rom = vec![0; 0x8000];
        rom[..code.len()].copy_from_slice(code);
        rom
    }

    #[test]
    fn empty_rom_is_rejected() {
        assert_eq!(
            Gameboy::new(Vec::<u8>::new(), Config::default()).unwrap_err(),
            InvalidRom::Empty
        );
    }

    #[test]
    fn step_feeds_the_ppu() {
        let mut gb = Gameboy::new(rom(&[0x00, 0x01, 0x34, 0x12]), Config::default()).unwrap();
        let outcome = gb.step().unwrap();
        assert_eq!(outcome.cycles, Cycles::from_m(1));
        assert!(!outcome.frame_completed);
        assert_eq!(gb.ppu().mode_clock(), 4);
        let outcome = gb.step().unwrap();
        assert_eq!(outcome.cycles, Cycles::from_m(3));
        assert_eq!(gb.cpu().regs.bc(), 0x1234);
        assert_eq!(gb.ppu().mode_clock(), 16);
    }

    #[test]
    fn nops_complete_a_frame() {
        let mut gb = Gameboy::new(rom(&[]), Config::default()).unwrap();
        let mut steps = 0;
        while !gb.step().unwrap().frame_completed {
            steps += 1;
        }
        // Every NOP is 4 clock cycles
        assert_eq!((steps + 1) * 4, 144 * 456);
        assert_eq!(gb.ppu().frames_completed(), 1);
    }

    #[test]
    fn halt_policy_stops_the_cpu() {
        let mut gb = Gameboy::new(rom(&[0xD3, 0x00]), Config::default()).unwrap();
        let err = gb.step().unwrap_err();
        assert_eq!(err.pc, 0x0000);
        assert_eq!(err.opcode, 0xD3);
        assert_eq!(gb.cpu().state, CpuState::Halted);
        assert_eq!(gb.cpu().regs.pc, 0x0001);
        assert_eq!(gb.faults(), 0);
        // Time still passes for a halted CPU
        assert_eq!(gb.step().unwrap().cycles, Cycles::from_m(1));
        assert_eq!(gb.cpu().regs.pc, 0x0001);
    }

    #[test]
    fn skip_policy_counts_faults() {
        let config = Config {
            unimplemented_opcode: UnimplementedPolicy::Skip,
            ..Config::default()
        };
        let mut gb = Gameboy::new(rom(&[0xD3, 0xFC, 0x3C]), config).unwrap();
        assert_eq!(gb.step().unwrap().cycles, Cycles::from_m(1));
        assert_eq!(gb.step().unwrap().cycles, Cycles::from_m(1));
        gb.step().unwrap();
        assert_eq!(gb.faults(), 2);
        assert!(gb.cpu().is_running());
        assert_eq!(gb.cpu().regs.a, 1);
    }

    #[test]
    fn boot_overlay_follows_config() {
        let config = Config {
            boot_overlay: true,
            ..Config::default()
        };
        let gb = Gameboy::new(rom(&[0x3C]), config).unwrap();
        assert!(gb.mem().in_bios());
        let gb = Gameboy::new(rom(&[0x3C]), Config::default()).unwrap();
        assert!(!gb.mem().in_bios());
    }
}
