//! The knobs a frontend can turn when constructing a [`Gameboy`](crate::Gameboy). Every field has a
//! default, so a config file only needs to name what it changes.

use serde::Deserialize;
use serde::Serialize;

use crate::ppu::Palette;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether reads below 0x0100 return the boot sentinel until PC reaches 0x0100.
    pub boot_overlay: bool,
    /// What to do when the CPU hits an op code with no operation.
    pub unimplemented_opcode: UnimplementedPolicy,
    /// Used by frontends to turn color indices into greys.
    pub palette: Palette,
}

#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UnimplementedPolicy {
    /// The CPU halts and the fault is returned to the caller.
    #[default]
    Halt,
    /// The fault is logged and counted, and execution continues after the op code.
    Skip,
}
