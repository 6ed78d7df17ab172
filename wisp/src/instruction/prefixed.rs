use crate::cpu::Cpu;
use crate::instruction::BitOp;
use crate::instruction::BitShiftOp;
use crate::mem::MemoryLike;

/// The instructions reached through the 0xCB prefix.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum PrefixedInstruction {
    #[display("{_0}")]
    BitShift(BitShiftOp),
    #[display("{_0}")]
    Bit(BitOp),
}

impl PrefixedInstruction {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        match self {
            PrefixedInstruction::BitShift(op) => op.execute(cpu, mem),
            PrefixedInstruction::Bit(op) => op.execute(cpu, mem),
        }
    }
}
