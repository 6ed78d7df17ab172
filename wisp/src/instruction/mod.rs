use crate::cpu::check_bit;
use crate::cpu::check_bit_const;
use crate::cpu::Cpu;
use crate::cpu::Cycles;
use crate::cpu::Flags;
use crate::mem::MemoryLike;

mod arithmetic;
mod bit;
mod bit_shift;
mod control;
mod jump;
mod load;
mod prefixed;

pub use arithmetic::*;
pub use bit::*;
pub use bit_shift::*;
pub use control::*;
pub use jump::*;
pub use load::*;
pub use prefixed::*;

// Instructions are decoded purely from their op code. None of the variants carry literals; any
// operand that follows the op code in memory is fetched (and PC advanced past it) while the
// instruction executes.

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum Instruction {
    #[display("{_0}")]
    Load(LoadOp),
    #[display("{_0}")]
    ControlOp(ControlOp),
    #[display("{_0}")]
    Jump(JumpOp),
    #[display("{_0}")]
    Arithmetic(ArithmeticOp),
    /// Only the four accumulator rotates (RLCA, RRCA, RLA, RRA) live in the unprefixed table.
    #[display("{_0}")]
    BitShift(BitShiftOp),
    #[display("DAA")]
    Daa,
    /// Set Carry.
    #[display("SCF")]
    Scf,
    /// ComPLement accumulator.
    #[display("CPL")]
    Cpl,
    /// CompLement carry flag.
    #[display("CCF")]
    Ccf,
    /// Disable interupts
    #[display("DI")]
    Di,
    /// Enable interupts
    #[display("EI")]
    Ei,
    /// Load the next byte as an op code for a prefixed instruction
    #[display("PREFIX CB")]
    Prefixed,
    /// Used for the handful of unused op codes
    #[display("UNUSED")]
    Unused,
}

impl Instruction {
    /// Runs the instruction against the CPU and memory. The op code has already been consumed.
    /// Returns `true` if a conditional branch was taken, which determines the cost of the
    /// instruction.
    ///
    /// `Prefixed` and `Unused` are resolved by the CPU before an instruction is executed, so they
    /// do nothing here.
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) -> bool {
        match self {
            Instruction::Load(op) => op.execute(cpu, mem),
            Instruction::ControlOp(op) => op.execute(cpu, mem),
            Instruction::Jump(op) => return op.execute(cpu, mem),
            Instruction::Arithmetic(op) => op.execute(cpu, mem),
            Instruction::BitShift(op) => op.execute(cpu, mem),
            Instruction::Daa => {
                let a = to_bcd(cpu.regs.a, &mut cpu.regs.f);
                cpu.regs.a = a;
            }
            Instruction::Scf => {
                let flags = &mut cpu.regs.f;
                flags.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                flags.insert(Flags::CARRY);
            }
            Instruction::Cpl => {
                cpu.regs.a = !cpu.regs.a;
                cpu.regs.f.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
            }
            Instruction::Ccf => {
                let flags = &mut cpu.regs.f;
                let carry = flags.c();
                flags.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                flags.set(Flags::CARRY, !carry);
            }
            Instruction::Di => cpu.disable_interupts(),
            Instruction::Ei => cpu.enable_interupts(),
            Instruction::Prefixed | Instruction::Unused => {}
        }
        false
    }
}

/// An entry in one of the op code lookup tables. Each descriptor pairs the decoded instruction
/// with what it costs to run.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Operation<I = Instruction> {
    pub instr: I,
    pub cost: Cost,
}

impl<I> Operation<I> {
    pub const fn new(instr: I, cost: Cost) -> Self {
        Self { instr, cost }
    }
}

/// The number of machine cycles an instruction takes. Conditional control flow costs more when the
/// branch is taken.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Cost {
    Fixed(u8),
    Branch { taken: u8, skipped: u8 },
}

impl Cost {
    pub const fn resolve(self, taken: bool) -> Cycles {
        let m = match self {
            Cost::Fixed(m) => m,
            Cost::Branch { taken: m, .. } if taken => m,
            Cost::Branch { skipped, .. } => skipped,
        };
        Cycles::from_m(m)
    }
}

/// Either a byte referenced by a register (or the HL pointer) or the byte that immediately follows
/// the op code.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::From, derive_more::Display)]
#[display("{_variant}")]
pub enum SomeByte {
    #[display("{_0}")]
    Referenced(RegOrPointer),
    #[display("n8")]
    Direct,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum WideReg {
    #[display("BC")]
    BC,
    #[display("DE")]
    DE,
    #[display("HL")]
    HL,
    #[display("SP")]
    SP,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum WideRegWithoutSP {
    #[display("BC")]
    BC,
    #[display("DE")]
    DE,
    #[display("HL")]
    HL,
    #[display("AF")]
    AF,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum Condition {
    #[display("Z")]
    Zero,
    #[display("NZ")]
    NotZero,
    #[display("C")]
    Carry,
    #[display("NC")]
    NotCarry,
}

impl Condition {
    pub fn passed(&self, cpu: &Cpu) -> bool {
        match self {
            Condition::Zero => cpu.zero_flag(),
            Condition::NotZero => !cpu.zero_flag(),
            Condition::Carry => cpu.carry_flag(),
            Condition::NotCarry => !cpu.carry_flag(),
        }
    }
}

/// There are special operations for loading into the A register, so it is easier to have a special
/// enum for the unique types of pointers they use.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum LoadAPointer {
    /// Use the BC register
    #[display("BC")]
    BC,
    /// Use the DE register
    #[display("DE")]
    DE,
    /// Use the HL register and increment after performing the operation
    #[display("HL+")]
    Hli,
    /// Use the HL register and decrement after performing the operation
    #[display("HL-")]
    Hld,
}

/// Selects one of the seven 8-bit general purpose registers.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum HalfRegister {
    #[display("A")]
    A,
    #[display("B")]
    B,
    #[display("C")]
    C,
    #[display("D")]
    D,
    #[display("E")]
    E,
    #[display("H")]
    H,
    #[display("L")]
    L,
}

impl HalfRegister {
    pub const ALL: [HalfRegister; 7] = [
        HalfRegister::A,
        HalfRegister::B,
        HalfRegister::C,
        HalfRegister::D,
        HalfRegister::E,
        HalfRegister::H,
        HalfRegister::L,
    ];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::From,
    derive_more::IsVariant,
    derive_more::Display,
)]
#[display("{_variant}")]
pub enum RegOrPointer {
    #[display("{_0}")]
    Reg(HalfRegister),
    #[display("(HL)")]
    Pointer,
}

impl RegOrPointer {
    /// Most of the op code table encodes an operand in three bits using the order
    /// B, C, D, E, H, L, (HL), A.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => RegOrPointer::Reg(HalfRegister::B),
            1 => RegOrPointer::Reg(HalfRegister::C),
            2 => RegOrPointer::Reg(HalfRegister::D),
            3 => RegOrPointer::Reg(HalfRegister::E),
            4 => RegOrPointer::Reg(HalfRegister::H),
            5 => RegOrPointer::Reg(HalfRegister::L),
            6 => RegOrPointer::Pointer,
            _ => RegOrPointer::Reg(HalfRegister::A),
        }
    }
}

/// Takes a byte that is in standard binary representation and converts it to binary coded decimal.
fn to_bcd(mut val: u8, flags: &mut Flags) -> u8 {
    if !flags.n() {
        // after an addition, adjust if (half-)carry occurred or if result is out of bounds
        if flags.c() || val > 0x99 {
            val = val.wrapping_add(0x60);
            flags.insert(Flags::CARRY);
        }
        if flags.h() || (val & 0x0f) > 0x09 {
            val = val.wrapping_add(0x6);
        }
    } else {
        if flags.c() {
            val = val.wrapping_sub(0x60);
        }
        if flags.h() {
            val = val.wrapping_sub(0x6);
        }
    }
    flags.set(Flags::ZERO, val == 0);
    flags.remove(Flags::HALF_CARRY);
    val
}
