use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum LoadOp {
    /// Used for opcodes in 0x40..0x80 (other than 0x76)
    #[display("LD {dest}, {src}")]
    Basic {
        dest: RegOrPointer,
        src: RegOrPointer,
    },
    /// Used for opcodes 0x_1
    #[display("LD {_0}, n16")]
    Direct16(WideReg),
    /// Used for opcodes 0x_6 and 0x_E
    #[display("LD {_0}, n8")]
    Direct(RegOrPointer),
    /// Used for opcodes 0x_A
    #[display("LD A, ({_0})")]
    LoadIntoA(LoadAPointer),
    /// Used for opcodes 0x_2
    #[display("LD ({_0}), A")]
    StoreFromA(LoadAPointer),
    /// Opcode: 0x08
    /// Store SP & $FF at address n16 and SP >> 8 at address n16 + 1.
    #[display("LD (a16), SP")]
    StoreSP,
    /// Opcode: 0xF9
    #[display("LD SP, HL")]
    HLIntoSP,
    /// Opcode: 0xF8
    /// Add the signed value e8 to SP and store the result in HL.
    #[display("LD HL, SP + e8")]
    SPIntoHL,
    /// Used for opcodes 0x_1
    #[display("POP {_0}")]
    Pop(WideRegWithoutSP),
    /// Used for opcodes 0x_5
    #[display("PUSH {_0}")]
    Push(WideRegWithoutSP),
    /// Used for opcode 0xE0
    #[display("LDH (a8), A")]
    StoreHigh,
    /// Used for opcode 0xF0
    #[display("LDH A, (a8)")]
    LoadHigh,
    /// Used for opcode 0xE2
    #[display("LD (C), A")]
    StoreHighC,
    /// Used for opcode 0xF2
    #[display("LD A, (C)")]
    LoadHighC,
    /// Used for opcode 0xEA
    #[display("LD (a16), A")]
    StoreA,
    /// Used for opcode 0xFA
    #[display("LD A, (a16)")]
    LoadA,
}

impl LoadOp {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        match self {
            LoadOp::Basic { dest, src } => {
                let byte = cpu.copy_byte(mem, src);
                cpu.write_byte(dest, mem, byte);
            }
            LoadOp::Direct16(reg) => {
                let val = cpu.fetch_word(mem);
                cpu.regs.set_wide(reg, val);
            }
            LoadOp::Direct(reg) => {
                let byte = cpu.fetch_byte(mem);
                cpu.write_byte(reg, mem, byte);
            }
            LoadOp::LoadIntoA(ptr) => {
                let addr = cpu.load_a_pointer(ptr);
                cpu.regs.a = mem.read_byte(addr);
            }
            LoadOp::StoreFromA(ptr) => {
                let addr = cpu.load_a_pointer(ptr);
                mem.write_byte(addr, cpu.regs.a);
            }
            LoadOp::StoreSP => {
                let addr = cpu.fetch_word(mem);
                mem.write_word(addr, cpu.regs.sp);
            }
            LoadOp::HLIntoSP => cpu.regs.sp = cpu.regs.hl(),
            LoadOp::SPIntoHL => {
                let offset = cpu.fetch_byte(mem) as i8;
                let val = offset_sp(cpu.regs.sp, offset, &mut cpu.regs.f);
                cpu.regs.set_hl(val);
            }
            LoadOp::Pop(reg) => {
                let val = cpu.pop_word(mem);
                cpu.regs.set_stack_pair(reg, val);
            }
            LoadOp::Push(reg) => {
                let val = cpu.regs.stack_pair(reg);
                cpu.push_word(mem, val);
            }
            LoadOp::StoreHigh => {
                let addr = 0xFF00 | cpu.fetch_byte(mem) as u16;
                mem.write_byte(addr, cpu.regs.a);
            }
            LoadOp::LoadHigh => {
                let addr = 0xFF00 | cpu.fetch_byte(mem) as u16;
                cpu.regs.a = mem.read_byte(addr);
            }
            LoadOp::StoreHighC => mem.write_byte(0xFF00 | cpu.regs.c as u16, cpu.regs.a),
            LoadOp::LoadHighC => cpu.regs.a = mem.read_byte(0xFF00 | cpu.regs.c as u16),
            LoadOp::StoreA => {
                let addr = cpu.fetch_word(mem);
                mem.write_byte(addr, cpu.regs.a);
            }
            LoadOp::LoadA => {
                let addr = cpu.fetch_word(mem);
                cpu.regs.a = mem.read_byte(addr);
            }
        }
    }
}

impl Cpu {
    /// Returns the address for one of the A register's special pointers, applying the HL
    /// increment/decrement afterwards.
    fn load_a_pointer(&mut self, ptr: LoadAPointer) -> u16 {
        match ptr {
            LoadAPointer::BC => self.regs.bc(),
            LoadAPointer::DE => self.regs.de(),
            LoadAPointer::Hli => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            LoadAPointer::Hld => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }
}

/// SP plus a signed offset, as used by `LD HL, SP + e8` and `ADD SP, e8`. The carries come from the
/// unsigned addition of the offset byte to the low byte of SP. Z and N are always cleared.
pub(super) fn offset_sp(sp: u16, offset: i8, flags: &mut Flags) -> u16 {
    let byte = offset as u8 as u16;
    flags.remove(Flags::ZERO | Flags::SUBTRACT);
    flags.set(Flags::HALF_CARRY, (sp & 0x0F) + (byte & 0x0F) > 0x0F);
    flags.set(Flags::CARRY, (sp & 0xFF) + byte > 0xFF);
    sp.wrapping_add_signed(offset as i16)
}
