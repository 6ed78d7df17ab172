//! The recoverable faults of the core. Bus decoding bugs and out-of-bounds accesses are not in here;
//! those panic.

/// The CPU fetched an op code that has no operation bound to it.
///
/// By the time this is returned, PC has moved past the op code and the clock has been charged for a
/// NOP, so a caller that wants to skip the byte can just step again.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "unimplemented op code {}0x{opcode:0>2X} at 0x{pc:0>4X}",
    if *prefixed { "0xCB " } else { "" }
)]
pub struct UnimplementedOpcode {
    /// The address the op code was fetched from.
    pub pc: u16,
    pub opcode: u8,
    /// Whether the op code came from the 0xCB table. Every 0xCB op code has an operation, so the
    /// CPU only reports faults from the unprefixed table; this stays `false` until the prefixed
    /// table gains a hole.
    pub prefixed: bool,
}

/// The ROM image handed to the core can not be used.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidRom {
    #[display("the ROM image is empty")]
    Empty,
}
