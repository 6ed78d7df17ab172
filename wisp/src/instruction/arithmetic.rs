use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ArithmeticOp {
    #[display("ADD A, {_0}")]
    Add(SomeByte),
    #[display("ADD HL, {_0}")]
    Add16(WideReg),
    #[display("ADD SP, e8")]
    AddSP,
    #[display("ADC A, {_0}")]
    Adc(SomeByte),
    #[display("SUB A, {_0}")]
    Sub(SomeByte),
    #[display("SBC A, {_0}")]
    Sbc(SomeByte),
    #[display("AND A, {_0}")]
    And(SomeByte),
    #[display("XOR A, {_0}")]
    Xor(SomeByte),
    #[display("OR A, {_0}")]
    Or(SomeByte),
    #[display("CP A, {_0}")]
    Cp(SomeByte),
    #[display("INC {_0}")]
    Inc(RegOrPointer),
    #[display("INC {_0}")]
    Inc16(WideReg),
    #[display("DEC {_0}")]
    Dec(RegOrPointer),
    #[display("DEC {_0}")]
    Dec16(WideReg),
}

impl ArithmeticOp {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        match self {
            ArithmeticOp::Add(byte) => {
                let byte = cpu.some_byte(mem, byte);
                cpu.regs.a = addition_operation(cpu.regs.a, byte, false, &mut cpu.regs.f);
            }
            ArithmeticOp::Adc(byte) => {
                let byte = cpu.some_byte(mem, byte);
                let carry = cpu.carry_flag();
                cpu.regs.a = addition_operation(cpu.regs.a, byte, carry, &mut cpu.regs.f);
            }
            ArithmeticOp::Sub(byte) => {
                let byte = cpu.some_byte(mem, byte);
                cpu.regs.a = subtraction_operation(cpu.regs.a, byte, false, &mut cpu.regs.f);
            }
            ArithmeticOp::Sbc(byte) => {
                let byte = cpu.some_byte(mem, byte);
                let carry = cpu.carry_flag();
                cpu.regs.a = subtraction_operation(cpu.regs.a, byte, carry, &mut cpu.regs.f);
            }
            ArithmeticOp::Cp(byte) => {
                // Only the flags are kept
                let byte = cpu.some_byte(mem, byte);
                subtraction_operation(cpu.regs.a, byte, false, &mut cpu.regs.f);
            }
            ArithmeticOp::And(byte) => {
                let byte = cpu.some_byte(mem, byte);
                cpu.regs.a &= byte;
                cpu.regs.f = Flags::HALF_CARRY;
                cpu.regs.f.set(Flags::ZERO, cpu.regs.a == 0);
            }
            ArithmeticOp::Xor(byte) => {
                let byte = cpu.some_byte(mem, byte);
                cpu.regs.a ^= byte;
                cpu.regs.f = Flags::NONE;
                cpu.regs.f.set(Flags::ZERO, cpu.regs.a == 0);
            }
            ArithmeticOp::Or(byte) => {
                let byte = cpu.some_byte(mem, byte);
                cpu.regs.a |= byte;
                cpu.regs.f = Flags::NONE;
                cpu.regs.f.set(Flags::ZERO, cpu.regs.a == 0);
            }
            ArithmeticOp::Inc(reg) => {
                let mut h = false;
                let val = cpu.update_byte(reg, mem, |byte| {
                    h = byte & 0x0F == 0x0F;
                    byte.wrapping_add(1)
                });
                let flags = &mut cpu.regs.f;
                flags.set(Flags::ZERO, val == 0);
                flags.remove(Flags::SUBTRACT);
                flags.set(Flags::HALF_CARRY, h);
            }
            ArithmeticOp::Dec(reg) => {
                let mut h = false;
                let val = cpu.update_byte(reg, mem, |byte| {
                    h = byte & 0x0F == 0;
                    byte.wrapping_sub(1)
                });
                let flags = &mut cpu.regs.f;
                flags.set(Flags::ZERO, val == 0);
                flags.insert(Flags::SUBTRACT);
                flags.set(Flags::HALF_CARRY, h);
            }
            ArithmeticOp::Inc16(reg) => {
                let val = cpu.regs.wide(reg).wrapping_add(1);
                cpu.regs.set_wide(reg, val);
            }
            ArithmeticOp::Dec16(reg) => {
                let val = cpu.regs.wide(reg).wrapping_sub(1);
                cpu.regs.set_wide(reg, val);
            }
            ArithmeticOp::Add16(reg) => {
                let value = cpu.regs.wide(reg);
                let hl = cpu.regs.hl();
                let (sum, carry) = hl.overflowing_add(value);
                let flags = &mut cpu.regs.f;
                flags.remove(Flags::SUBTRACT);
                flags.set(Flags::HALF_CARRY, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
                flags.set(Flags::CARRY, carry);
                cpu.regs.set_hl(sum);
            }
            ArithmeticOp::AddSP => {
                let offset = cpu.fetch_byte(mem) as i8;
                cpu.regs.sp = offset_sp(cpu.regs.sp, offset, &mut cpu.regs.f);
            }
        }
    }
}

/// Adds `op` (and the carry, if given) to `val`, setting all four flags from the result.
pub(crate) fn addition_operation(val: u8, op: u8, carry: bool, flags: &mut Flags) -> u8 {
    let carry = carry as u16;
    let sum = val as u16 + op as u16 + carry;
    let result = sum as u8;
    flags.set(Flags::ZERO, result == 0);
    flags.remove(Flags::SUBTRACT);
    flags.set(
        Flags::HALF_CARRY,
        (val & 0x0F) as u16 + (op & 0x0F) as u16 + carry > 0x0F,
    );
    flags.set(Flags::CARRY, sum > 0xFF);
    result
}

/// Subtracts `op` (and the carry, if given) from `val`, setting all four flags from the result.
pub(crate) fn subtraction_operation(val: u8, op: u8, carry: bool, flags: &mut Flags) -> u8 {
    let carry = carry as u16;
    let result = val.wrapping_sub(op).wrapping_sub(carry as u8);
    flags.set(Flags::ZERO, result == 0);
    flags.insert(Flags::SUBTRACT);
    flags.set(
        Flags::HALF_CARRY,
        ((val & 0x0F) as u16) < (op & 0x0F) as u16 + carry,
    );
    flags.set(Flags::CARRY, (val as u16) < op as u16 + carry);
    result
}
