use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ControlOp {
    #[display("HALT")]
    Halt,
    #[display("NOP")]
    Noop,
    /// Encoded as `10 00`. The padding byte is consumed along with the op code.
    #[display("STOP")]
    Stop,
}

impl ControlOp {
    pub(crate) fn execute<M: MemoryLike>(self, cpu: &mut Cpu, mem: &mut M) {
        match self {
            ControlOp::Noop => {}
            ControlOp::Halt => cpu.halt(),
            ControlOp::Stop => {
                let _ = cpu.fetch_byte(mem);
                cpu.stop();
            }
        }
    }
}
