use std::hash::Hash;

use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::error::UnimplementedOpcode;
use crate::instruction::Instruction;
use crate::instruction::RegOrPointer;
use crate::instruction::SomeByte;
use crate::lookup;
use crate::mem::MemoryLike;
use crate::mem::MemoryLikeExt;

mod flags;
mod registers;

#[cfg(test)]
mod cpu_tests;

pub use flags::Flags;
pub use registers::Registers;

#[derive(Debug, Default, Hash, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display(
    "CPU {{ A=0x{:0>2X} F={} B=0x{:0>2X} C=0x{:0>2X} D=0x{:0>2X} E=0x{:0>2X} H=0x{:0>2X} L=0x{:0>2X} SP=0x{:0>4X} PC=0x{:0>4X} IME={} R={} State={} }}",
    regs.a,
    regs.f,
    regs.b,
    regs.c,
    regs.d,
    regs.e,
    regs.h,
    regs.l,
    regs.sp,
    regs.pc,
    regs.ime,
    regs.r,
    state
)]
pub struct Cpu {
    pub regs: Registers,
    pub clock: Clock,
    /// Once the CPU has halted (or stopped), this is set. The CPU can continue to be stepped, but
    /// nothing is fetched, so only time passes.
    pub state: CpuState,
}

#[derive(
    Debug, Default, Hash, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
pub enum CpuState {
    #[default]
    Running,
    Halted,
    Stopped,
}

/// The cost of one step. A machine cycle (m) is four clock cycles (t).
#[derive(Debug, Default, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycles {
    pub m: u32,
    pub t: u32,
}

impl Cycles {
    pub const fn from_m(m: u8) -> Self {
        Self {
            m: m as u32,
            t: 4 * m as u32,
        }
    }
}

/// The running totals of every cycle the CPU has spent, plus the cost of the last step.
#[derive(Debug, Default, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    pub m: u64,
    pub t: u64,
    pub last: Cycles,
}

impl Clock {
    fn tick(&mut self, cycles: Cycles) {
        self.m += cycles.m as u64;
        self.t += cycles.t as u64;
        self.last = cycles;
    }
}

const fn bit_select<const B: u8>() -> u8 {
    const {
        match B {
            n @ 0..=7 => 0x1 << n,
            _ => panic!("You must select between the 0th and 7th bit!"),
        }
    }
}

pub(crate) const fn check_bit(bit: u8, src: u8) -> bool {
    let bit = 0x1 << bit;
    (src & bit) == bit
}

pub const fn check_bit_const<const B: u8>(src: u8) -> bool {
    (src & bit_select::<B>()) == bit_select::<B>()
}

impl Cpu {
    /// Constructs a new CPU with each register set to 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Get the top four bits of the F register
    pub fn flags(&self) -> &Flags {
        &self.regs.f
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.regs.f
    }

    /// Returns the value of the Z flag
    pub fn zero_flag(&self) -> bool {
        self.regs.f.z()
    }

    /// Returns the value of the N flag
    pub fn subtraction_flag(&self) -> bool {
        self.regs.f.n()
    }

    /// Returns the value of the H flag
    pub fn half_carry_flag(&self) -> bool {
        self.regs.f.h()
    }

    /// Returns the value of the C flag
    pub fn carry_flag(&self) -> bool {
        self.regs.f.c()
    }

    /// Decodes the instruction at PC without running it.
    pub fn read_op(&self, mem: &impl MemoryLike) -> Instruction {
        lookup::decode_at(mem, self.regs.pc).instr
    }

    /// Runs exactly one instruction and returns what it cost.
    ///
    /// If the CPU is not running, nothing is fetched and one machine cycle passes. If the op code
    /// has no operation, PC is left just past it and one machine cycle is charged before the fault
    /// is returned.
    pub fn step<M: MemoryLike>(&mut self, mem: &mut M) -> Result<Cycles, UnimplementedOpcode> {
        if !self.is_running() {
            self.clock.tick(Cycles::from_m(1));
            return Ok(Cycles::from_m(1));
        }
        self.regs.r = self.regs.r.wrapping_add(1) & 0x7F;
        let pc = self.regs.pc;
        let op = lookup::decode_at(mem, pc);
        // Consume the op code. Anything else the operation needs is fetched while it runs.
        self.inc_pc();
        let result = match op.instr {
            Instruction::Unused => Err(UnimplementedOpcode {
                pc,
                opcode: mem.read_byte(pc),
                prefixed: false,
            }),
            Instruction::Prefixed => {
                let op = lookup::prefixed_operation(self.fetch_byte(mem));
                trace!("0x{pc:0>4X}: {}", op.instr);
                op.instr.execute(self, mem);
                Ok(op.cost.resolve(false))
            }
            instr => {
                trace!("0x{pc:0>4X}: {instr}");
                let taken = instr.execute(self, mem);
                Ok(op.cost.resolve(taken))
            }
        };
        let cycles = match &result {
            Ok(cycles) => *cycles,
            Err(_) => Cycles::from_m(1),
        };
        self.clock.tick(cycles);
        if mem.in_bios() && self.regs.pc == 0x0100 {
            mem.exit_bios();
        }
        result
    }

    pub fn inc_pc(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
    }

    /// Reads the byte at PC and moves PC past it.
    pub(crate) fn fetch_byte(&mut self, mem: &impl MemoryLike) -> u8 {
        let byte = mem.read_byte(self.regs.pc);
        self.inc_pc();
        byte
    }

    /// Reads the little-endian word at PC and moves PC past it.
    pub(crate) fn fetch_word(&mut self, mem: &impl MemoryLike) -> u16 {
        let lo = self.fetch_byte(mem);
        let hi = self.fetch_byte(mem);
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn enable_interupts(&mut self) {
        self.regs.ime = true;
    }

    pub(crate) fn disable_interupts(&mut self) {
        self.regs.ime = false;
    }

    pub(crate) fn halt(&mut self) {
        self.state = CpuState::Halted;
    }

    pub(crate) fn stop(&mut self) {
        self.state = CpuState::Stopped;
    }

    /// The value of HL, used as a pointer by every `(HL)` operand.
    pub fn ptr(&self) -> u16 {
        self.regs.hl()
    }

    pub fn copy_byte(&self, mem: &impl MemoryLike, reg: RegOrPointer) -> u8 {
        match reg {
            RegOrPointer::Reg(reg) => self.regs[reg],
            RegOrPointer::Pointer => mem.read_byte(self.ptr()),
        }
    }

    /// Resolves the operand of an ALU instruction, fetching the immediate byte if there is one.
    pub(crate) fn some_byte(&mut self, mem: &impl MemoryLike, byte: SomeByte) -> u8 {
        match byte {
            SomeByte::Direct => self.fetch_byte(mem),
            SomeByte::Referenced(reg) => self.copy_byte(mem, reg),
        }
    }

    /// Reads the byte from a register (or `(HL)`), passes it through `update`, and writes the result
    /// back. Returns the new value.
    pub(crate) fn update_byte(
        &mut self,
        reg: RegOrPointer,
        mem: &mut impl MemoryLike,
        update: impl FnOnce(u8) -> u8,
    ) -> u8 {
        match reg {
            RegOrPointer::Reg(reg) => {
                let val = update(self.regs[reg]);
                self.regs[reg] = val;
                val
            }
            RegOrPointer::Pointer => mem.update_byte(self.ptr(), update),
        }
    }

    /// Stores the given byte into either an (half) register or into memory using the HL register as
    /// an index.
    pub(crate) fn write_byte(&mut self, reg: RegOrPointer, mem: &mut impl MemoryLike, val: u8) {
        match reg {
            RegOrPointer::Reg(reg) => self.regs[reg] = val,
            RegOrPointer::Pointer => mem.write_byte(self.ptr(), val),
        }
    }

    /// Pushes a word onto the stack, high byte first.
    pub(crate) fn push_word(&mut self, mem: &mut impl MemoryLike, val: u16) {
        let [hi, lo] = val.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        mem.write_byte(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        mem.write_byte(self.regs.sp, lo);
    }

    pub(crate) fn pop_word(&mut self, mem: &impl MemoryLike) -> u16 {
        let lo = mem.read_byte(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = mem.read_byte(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }
}
