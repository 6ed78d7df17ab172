use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{op} {bit}, {reg}")]
pub struct BitOp {
    pub bit: u8,
    pub reg: RegOrPointer,
    pub op: BitOpInner,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum BitOpInner {
    #[display("BIT")]
    Bit,
    #[display("RES")]
    Res,
    #[display("SET")]
    Set,
}

impl BitOp {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        let BitOp { bit, reg, op } = self;
        debug_assert!(bit < 8);
        let mask = 0x1 << bit;
        match op {
            BitOpInner::Bit => {
                let set = check_bit(bit, cpu.copy_byte(mem, reg));
                let flags = &mut cpu.regs.f;
                flags.set(Flags::ZERO, !set);
                flags.remove(Flags::SUBTRACT);
                flags.insert(Flags::HALF_CARRY);
            }
            BitOpInner::Res => {
                cpu.update_byte(reg, mem, |byte| byte & !mask);
            }
            BitOpInner::Set => {
                cpu.update_byte(reg, mem, |byte| byte | mask);
            }
        }
    }
}
