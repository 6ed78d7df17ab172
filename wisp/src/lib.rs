//! Wisp is the core crate of the lantern project. Contained here is all of the logic for emulating
//! the handheld's CPU, memory bus, and display timing. This crate aims to be platform agnostic and
//! free of the UI-specifics. Frontends supply the ROM bytes and consume finished frames of color
//! indices; how they get the bytes and what they do with the frames is up to them.
//!
//! # Notes
//! The bus is little endian. Register pairs are big endian (the first register is the high byte).

pub mod config;
pub mod cpu;
pub mod error;
pub mod gameboy;
pub mod instruction;
pub mod lookup;
pub mod mem;
pub mod ppu;

pub use config::Config;
pub use config::UnimplementedPolicy;
pub use gameboy::Gameboy;
pub use gameboy::StepOutcome;
