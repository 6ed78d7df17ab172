use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum JumpOp {
    #[display("JR {_0}, e8")]
    ConditionalRelative(Condition),
    #[display("JR e8")]
    Relative,
    #[display("JP {_0}, a16")]
    ConditionalAbsolute(Condition),
    #[display("JP a16")]
    Absolute,
    #[display("JP HL")]
    JumpToHL,
    #[display("CALL a16")]
    Call,
    #[display("CALL {_0}, a16")]
    ConditionalCall(Condition),
    #[display("RET")]
    Return,
    #[display("RET {_0}")]
    ConditionalReturn(Condition),
    #[display("RETI")]
    ReturnAndEnable,
    /// Calls one of the eight fixed vectors 0x00, 0x08, .., 0x38.
    #[display("RST 0x{_0:0>2X}")]
    Rst(u8),
    /// Decrements B and jumps relative if it is not zero.
    #[display("DJNZ e8")]
    Djnz,
}

impl JumpOp {
    /// Returns `true` if the jump was taken.
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) -> bool {
        match self {
            JumpOp::Relative => {
                let offset = cpu.fetch_byte(mem) as i8;
                cpu.jump_relative(offset);
                true
            }
            JumpOp::ConditionalRelative(cond) => {
                // The operand is always consumed, even if the jump is skipped
                let offset = cpu.fetch_byte(mem) as i8;
                let passed = cond.passed(cpu);
                if passed {
                    cpu.jump_relative(offset);
                }
                passed
            }
            JumpOp::Absolute => {
                cpu.regs.pc = cpu.fetch_word(mem);
                true
            }
            JumpOp::ConditionalAbsolute(cond) => {
                let addr = cpu.fetch_word(mem);
                let passed = cond.passed(cpu);
                if passed {
                    cpu.regs.pc = addr;
                }
                passed
            }
            JumpOp::JumpToHL => {
                cpu.regs.pc = cpu.regs.hl();
                true
            }
            JumpOp::Call => {
                let addr = cpu.fetch_word(mem);
                cpu.call(mem, addr);
                true
            }
            JumpOp::ConditionalCall(cond) => {
                let addr = cpu.fetch_word(mem);
                let passed = cond.passed(cpu);
                if passed {
                    cpu.call(mem, addr);
                }
                passed
            }
            JumpOp::Return => {
                cpu.regs.pc = cpu.pop_word(mem);
                true
            }
            JumpOp::ConditionalReturn(cond) => {
                let passed = cond.passed(cpu);
                if passed {
                    cpu.regs.pc = cpu.pop_word(mem);
                }
                passed
            }
            JumpOp::ReturnAndEnable => {
                cpu.regs.pc = cpu.pop_word(mem);
                cpu.enable_interupts();
                true
            }
            JumpOp::Rst(vector) => {
                cpu.call(mem, vector as u16);
                true
            }
            JumpOp::Djnz => {
                let offset = cpu.fetch_byte(mem) as i8;
                cpu.regs.b = cpu.regs.b.wrapping_sub(1);
                let taken = cpu.regs.b != 0;
                if taken {
                    cpu.jump_relative(offset);
                }
                taken
            }
        }
    }
}

impl Cpu {
    /// The offset is relative to the address after the operand, which is where PC already points.
    fn jump_relative(&mut self, offset: i8) {
        self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
    }

    fn call(&mut self, mem: &mut impl MemoryLike, addr: u16) {
        let ret = self.regs.pc;
        self.push_word(mem, ret);
        self.regs.pc = addr;
    }
}
