use std::sync::LazyLock;

use crate::instruction::*;
use crate::mem::MemoryLike;

/// Every unprefixed op code, indexed by the op code itself. Built on first use.
static OP_LOOKUP: LazyLock<[Operation; 0x100]> =
    LazyLock::new(|| std::array::from_fn(|op| decode(op as u8)));

/// Every op code that follows the 0xCB prefix.
static PREFIXED_OP_LOOKUP: LazyLock<[Operation<PrefixedInstruction>; 0x100]> =
    LazyLock::new(|| std::array::from_fn(|op| decode_prefixed(op as u8)));

/// `10 00` is STOP. Any other byte after 0x10 makes it a DJNZ.
const STOP: Operation = Operation::new(Instruction::ControlOp(ControlOp::Stop), Cost::Fixed(1));

pub fn operation(op: u8) -> Operation {
    OP_LOOKUP[op as usize]
}

pub fn prefixed_operation(op: u8) -> Operation<PrefixedInstruction> {
    PREFIXED_OP_LOOKUP[op as usize]
}

/// Decodes the operation at `pc`. This is the table entry for the op code, except for 0x10, which
/// also depends on the byte after it.
pub fn decode_at<M: MemoryLike + ?Sized>(mem: &M, pc: u16) -> Operation {
    match mem.read_byte(pc) {
        0x10 if mem.read_byte(pc.wrapping_add(1)) == 0x00 => STOP,
        op => operation(op),
    }
}

const fn fixed<I>(instr: I, m: u8) -> Operation<I> {
    Operation::new(instr, Cost::Fixed(m))
}

const fn branch(instr: Instruction, taken: u8, skipped: u8) -> Operation {
    Operation::new(instr, Cost::Branch { taken, skipped })
}

const fn load(op: LoadOp, m: u8) -> Operation {
    fixed(Instruction::Load(op), m)
}

const fn arith(op: ArithmeticOp, m: u8) -> Operation {
    fixed(Instruction::Arithmetic(op), m)
}

const fn jump(op: JumpOp, m: u8) -> Operation {
    fixed(Instruction::Jump(op), m)
}

/// The pair selected by bits 4 and 5 of the op code, for the ops that can use SP.
const fn wide_reg(op: u8) -> WideReg {
    match (op >> 4) & 0x3 {
        0 => WideReg::BC,
        1 => WideReg::DE,
        2 => WideReg::HL,
        _ => WideReg::SP,
    }
}

/// The pair selected by bits 4 and 5 of the op code, for PUSH and POP.
const fn stack_reg(op: u8) -> WideRegWithoutSP {
    match (op >> 4) & 0x3 {
        0 => WideRegWithoutSP::BC,
        1 => WideRegWithoutSP::DE,
        2 => WideRegWithoutSP::HL,
        _ => WideRegWithoutSP::AF,
    }
}

/// The condition selected by bits 3 and 4 of the op code.
const fn condition(op: u8) -> Condition {
    match (op >> 3) & 0x3 {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NotCarry,
        _ => Condition::Carry,
    }
}

/// The eight ALU ops share one layout: the op is in bits 3..6 and the operand either in bits 0..3
/// or, for 0xC6..0xFE, the byte after the op code.
const fn alu(op: u8, byte: SomeByte) -> ArithmeticOp {
    match (op >> 3) & 0x7 {
        0 => ArithmeticOp::Add(byte),
        1 => ArithmeticOp::Adc(byte),
        2 => ArithmeticOp::Sub(byte),
        3 => ArithmeticOp::Sbc(byte),
        4 => ArithmeticOp::And(byte),
        5 => ArithmeticOp::Xor(byte),
        6 => ArithmeticOp::Or(byte),
        _ => ArithmeticOp::Cp(byte),
    }
}

/// Pointer operands take an extra machine cycle (or two, for a read-modify-write).
const fn pointer_cost(reg: RegOrPointer, m: u8, extra: u8) -> u8 {
    match reg {
        RegOrPointer::Pointer => m + extra,
        RegOrPointer::Reg(_) => m,
    }
}

fn decode(op: u8) -> Operation {
    let dest = RegOrPointer::from_bits(op >> 3);
    let src = RegOrPointer::from_bits(op);
    match op {
        0x00 => fixed(Instruction::ControlOp(ControlOp::Noop), 1),
        0x76 => fixed(Instruction::ControlOp(ControlOp::Halt), 1),
        0x10 => branch(Instruction::Jump(JumpOp::Djnz), 3, 2),

        // 16-bit loads and arithmetic
        0x01 | 0x11 | 0x21 | 0x31 => load(LoadOp::Direct16(wide_reg(op)), 3),
        0x03 | 0x13 | 0x23 | 0x33 => arith(ArithmeticOp::Inc16(wide_reg(op)), 2),
        0x0B | 0x1B | 0x2B | 0x3B => arith(ArithmeticOp::Dec16(wide_reg(op)), 2),
        0x09 | 0x19 | 0x29 | 0x39 => arith(ArithmeticOp::Add16(wide_reg(op)), 2),
        0x08 => load(LoadOp::StoreSP, 5),

        // Accumulator loads through pointers
        0x02 => load(LoadOp::StoreFromA(LoadAPointer::BC), 2),
        0x12 => load(LoadOp::StoreFromA(LoadAPointer::DE), 2),
        0x22 => load(LoadOp::StoreFromA(LoadAPointer::Hli), 2),
        0x32 => load(LoadOp::StoreFromA(LoadAPointer::Hld), 2),
        0x0A => load(LoadOp::LoadIntoA(LoadAPointer::BC), 2),
        0x1A => load(LoadOp::LoadIntoA(LoadAPointer::DE), 2),
        0x2A => load(LoadOp::LoadIntoA(LoadAPointer::Hli), 2),
        0x3A => load(LoadOp::LoadIntoA(LoadAPointer::Hld), 2),

        // 8-bit INC, DEC, and immediate loads
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            arith(ArithmeticOp::Inc(dest), pointer_cost(dest, 1, 2))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            arith(ArithmeticOp::Dec(dest), pointer_cost(dest, 1, 2))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            load(LoadOp::Direct(dest), pointer_cost(dest, 2, 1))
        }

        // Accumulator rotates and flag ops
        0x07 => fixed(Instruction::BitShift(BitShiftOp::Rlca), 1),
        0x0F => fixed(Instruction::BitShift(BitShiftOp::Rrca), 1),
        0x17 => fixed(Instruction::BitShift(BitShiftOp::Rla), 1),
        0x1F => fixed(Instruction::BitShift(BitShiftOp::Rra), 1),
        0x27 => fixed(Instruction::Daa, 1),
        0x2F => fixed(Instruction::Cpl, 1),
        0x37 => fixed(Instruction::Scf, 1),
        0x3F => fixed(Instruction::Ccf, 1),

        // Relative jumps
        0x18 => jump(JumpOp::Relative, 3),
        0x20 | 0x28 | 0x30 | 0x38 => {
            branch(Instruction::Jump(JumpOp::ConditionalRelative(condition(op))), 3, 2)
        }

        // Register to register loads
        0x40..=0x7F => {
            let m = match (dest, src) {
                (RegOrPointer::Pointer, _) | (_, RegOrPointer::Pointer) => 2,
                _ => 1,
            };
            load(LoadOp::Basic { dest, src }, m)
        }

        // ALU ops on registers, (HL), and immediates
        0x80..=0xBF => {
            let byte = SomeByte::Referenced(src);
            arith(alu(op, byte), pointer_cost(src, 1, 1))
        }
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => arith(alu(op, SomeByte::Direct), 2),

        // Calls, returns, and jumps
        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            branch(Instruction::Jump(JumpOp::ConditionalReturn(condition(op))), 5, 2)
        }
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            branch(Instruction::Jump(JumpOp::ConditionalAbsolute(condition(op))), 4, 3)
        }
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            branch(Instruction::Jump(JumpOp::ConditionalCall(condition(op))), 6, 3)
        }
        0xC3 => jump(JumpOp::Absolute, 4),
        0xC9 => jump(JumpOp::Return, 4),
        0xD9 => jump(JumpOp::ReturnAndEnable, 4),
        0xCD => jump(JumpOp::Call, 6),
        0xE9 => jump(JumpOp::JumpToHL, 1),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => jump(JumpOp::Rst(op & 0x38), 4),

        // Stack
        0xC1 | 0xD1 | 0xE1 | 0xF1 => load(LoadOp::Pop(stack_reg(op)), 3),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => load(LoadOp::Push(stack_reg(op)), 4),
        0xE8 => arith(ArithmeticOp::AddSP, 4),
        0xF8 => load(LoadOp::SPIntoHL, 3),
        0xF9 => load(LoadOp::HLIntoSP, 2),

        // The high page and absolute accumulator loads
        0xE0 => load(LoadOp::StoreHigh, 3),
        0xF0 => load(LoadOp::LoadHigh, 3),
        0xE2 => load(LoadOp::StoreHighC, 2),
        0xF2 => load(LoadOp::LoadHighC, 2),
        0xEA => load(LoadOp::StoreA, 4),
        0xFA => load(LoadOp::LoadA, 4),

        0xF3 => fixed(Instruction::Di, 1),
        0xFB => fixed(Instruction::Ei, 1),
        // The cost of the prefixed op covers the prefix
        0xCB => fixed(Instruction::Prefixed, 0),

        // 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD
        _ => fixed(Instruction::Unused, 1),
    }
}

fn decode_prefixed(op: u8) -> Operation<PrefixedInstruction> {
    let reg = RegOrPointer::from_bits(op);
    let bit = (op >> 3) & 0x7;
    let inner = match op >> 6 {
        0 => {
            let op = match bit {
                0 => BitShiftOp::Rlc(reg),
                1 => BitShiftOp::Rrc(reg),
                2 => BitShiftOp::Rl(reg),
                3 => BitShiftOp::Rr(reg),
                4 => BitShiftOp::Sla(reg),
                5 => BitShiftOp::Sra(reg),
                6 => BitShiftOp::Swap(reg),
                _ => BitShiftOp::Srl(reg),
            };
            return fixed(PrefixedInstruction::BitShift(op), pointer_cost(reg, 2, 2));
        }
        1 => {
            let op = BitOp {
                bit,
                reg,
                op: BitOpInner::Bit,
            };
            // BIT only reads (HL), so it is one cycle cheaper than the other pointer ops
            return fixed(PrefixedInstruction::Bit(op), pointer_cost(reg, 2, 1));
        }
        2 => BitOpInner::Res,
        _ => BitOpInner::Set,
    };
    let op = BitOp {
        bit,
        reg,
        op: inner,
    };
    fixed(PrefixedInstruction::Bit(op), pointer_cost(reg, 2, 2))
}
