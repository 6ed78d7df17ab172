use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum BitShiftOp {
    #[display("RLC {_0}")]
    Rlc(RegOrPointer),
    #[display("RLCA")]
    Rlca,
    #[display("RRC {_0}")]
    Rrc(RegOrPointer),
    #[display("RRCA")]
    Rrca,
    #[display("RL {_0}")]
    Rl(RegOrPointer),
    #[display("RLA")]
    Rla,
    #[display("RR {_0}")]
    Rr(RegOrPointer),
    #[display("RRA")]
    Rra,
    #[display("SLA {_0}")]
    Sla(RegOrPointer),
    #[display("SRA {_0}")]
    Sra(RegOrPointer),
    #[display("SWAP {_0}")]
    Swap(RegOrPointer),
    #[display("SRL {_0}")]
    Srl(RegOrPointer),
}

/// The shift that an op applies to its byte, independent of where the byte lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl Shift {
    /// Returns the shifted byte and the new carry.
    fn apply(self, byte: u8, carry: bool) -> (u8, bool) {
        match self {
            Shift::Rlc => (byte.rotate_left(1), check_bit_const::<7>(byte)),
            Shift::Rrc => (byte.rotate_right(1), check_bit_const::<0>(byte)),
            Shift::Rl => ((byte << 1) | carry as u8, check_bit_const::<7>(byte)),
            Shift::Rr => ((byte >> 1) | ((carry as u8) << 7), check_bit_const::<0>(byte)),
            Shift::Sla => (byte << 1, check_bit_const::<7>(byte)),
            Shift::Sra => ((byte >> 1) | (byte & 0x80), check_bit_const::<0>(byte)),
            Shift::Swap => (byte.rotate_left(4), false),
            Shift::Srl => (byte >> 1, check_bit_const::<0>(byte)),
        }
    }
}

impl BitShiftOp {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        let (shift, reg) = match self {
            // The accumulator rotates always clear Z
            BitShiftOp::Rlca => return cpu.rotate_a(Shift::Rlc),
            BitShiftOp::Rrca => return cpu.rotate_a(Shift::Rrc),
            BitShiftOp::Rla => return cpu.rotate_a(Shift::Rl),
            BitShiftOp::Rra => return cpu.rotate_a(Shift::Rr),
            BitShiftOp::Rlc(reg) => (Shift::Rlc, reg),
            BitShiftOp::Rrc(reg) => (Shift::Rrc, reg),
            BitShiftOp::Rl(reg) => (Shift::Rl, reg),
            BitShiftOp::Rr(reg) => (Shift::Rr, reg),
            BitShiftOp::Sla(reg) => (Shift::Sla, reg),
            BitShiftOp::Sra(reg) => (Shift::Sra, reg),
            BitShiftOp::Swap(reg) => (Shift::Swap, reg),
            BitShiftOp::Srl(reg) => (Shift::Srl, reg),
        };
        let carry_in = cpu.carry_flag();
        let mut carry = false;
        let val = cpu.update_byte(reg, mem, |byte| {
            let (byte, c) = shift.apply(byte, carry_in);
            carry = c;
            byte
        });
        cpu.regs.f.set_for_byte_shift_op(val == 0, carry);
    }
}

impl Cpu {
    fn rotate_a(&mut self, shift: Shift) {
        let (a, carry) = shift.apply(self.regs.a, self.carry_flag());
        self.regs.a = a;
        self.regs.f.set_for_byte_shift_op(false, carry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_through_carry() {
        assert_eq!(Shift::Rl.apply(0x80, false), (0x00, true));
        assert_eq!(Shift::Rl.apply(0x00, true), (0x01, false));
        assert_eq!(Shift::Rr.apply(0x01, false), (0x00, true));
        assert_eq!(Shift::Rr.apply(0x00, true), (0x80, false));
    }

    #[test]
    fn rotates_without_carry() {
        assert_eq!(Shift::Rlc.apply(0x81, false), (0x03, true));
        assert_eq!(Shift::Rrc.apply(0x81, false), (0xC0, true));
    }

    #[test]
    fn shifts() {
        assert_eq!(Shift::Sla.apply(0xC1, true), (0x82, true));
        assert_eq!(Shift::Sra.apply(0x81, false), (0xC0, true));
        assert_eq!(Shift::Srl.apply(0x81, false), (0x40, true));
        assert_eq!(Shift::Swap.apply(0xA5, true), (0x5A, false));
    }
}
