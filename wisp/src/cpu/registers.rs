use std::ops::Index;
use std::ops::IndexMut;

use serde::Deserialize;
use serde::Serialize;

use crate::instruction::HalfRegister;
use crate::instruction::WideReg;
use crate::instruction::WideRegWithoutSP;

use super::Flags;

/// The register file. All 8-bit registers wrap at 256 and PC/SP wrap at 65536; the arithmetic that
/// updates them always uses the `wrapping_*` methods.
#[derive(Debug, Default, Hash, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    /// The SP register
    pub sp: u16,
    /// The PC register
    pub pc: u16,
    /// Interrupt master enable. Nothing dispatches interrupts, but EI/DI/RETI still track it.
    pub ime: bool,
    /// The memory refresh counter. Only the bottom seven bits ever count.
    pub r: u8,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f.as_byte()])
    }

    /// Loads the AF pair. The low nibble of F can not be set.
    pub fn set_af(&mut self, val: u16) {
        let [a, f] = val.to_be_bytes();
        self.a = a;
        self.f = Flags::from_byte(f);
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn set_bc(&mut self, val: u16) {
        [self.b, self.c] = val.to_be_bytes();
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn set_de(&mut self, val: u16) {
        [self.d, self.e] = val.to_be_bytes();
    }

    /// The HL pair, which doubles as the pointer for every `(HL)` operand.
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, val: u16) {
        [self.h, self.l] = val.to_be_bytes();
    }

    pub fn wide(&self, reg: WideReg) -> u16 {
        match reg {
            WideReg::BC => self.bc(),
            WideReg::DE => self.de(),
            WideReg::HL => self.hl(),
            WideReg::SP => self.sp,
        }
    }

    pub fn set_wide(&mut self, reg: WideReg, val: u16) {
        match reg {
            WideReg::BC => self.set_bc(val),
            WideReg::DE => self.set_de(val),
            WideReg::HL => self.set_hl(val),
            WideReg::SP => self.sp = val,
        }
    }

    pub fn stack_pair(&self, reg: WideRegWithoutSP) -> u16 {
        match reg {
            WideRegWithoutSP::BC => self.bc(),
            WideRegWithoutSP::DE => self.de(),
            WideRegWithoutSP::HL => self.hl(),
            WideRegWithoutSP::AF => self.af(),
        }
    }

    pub fn set_stack_pair(&mut self, reg: WideRegWithoutSP, val: u16) {
        match reg {
            WideRegWithoutSP::BC => self.set_bc(val),
            WideRegWithoutSP::DE => self.set_de(val),
            WideRegWithoutSP::HL => self.set_hl(val),
            WideRegWithoutSP::AF => self.set_af(val),
        }
    }
}

impl Index<HalfRegister> for Registers {
    type Output = u8;

    fn index(&self, index: HalfRegister) -> &Self::Output {
        match index {
            HalfRegister::A => &self.a,
            HalfRegister::B => &self.b,
            HalfRegister::C => &self.c,
            HalfRegister::D => &self.d,
            HalfRegister::E => &self.e,
            HalfRegister::H => &self.h,
            HalfRegister::L => &self.l,
        }
    }
}

impl IndexMut<HalfRegister> for Registers {
    fn index_mut(&mut self, index: HalfRegister) -> &mut Self::Output {
        match index {
            HalfRegister::A => &mut self.a,
            HalfRegister::B => &mut self.b,
            HalfRegister::C => &mut self.c,
            HalfRegister::D => &mut self.d,
            HalfRegister::E => &mut self.e,
            HalfRegister::H => &mut self.h,
            HalfRegister::L => &mut self.l,
        }
    }
}
