use std::fmt;
use std::ops::Not;

use serde::Deserialize;
use serde::Serialize;

/// The F register. Only the top nibble carries meaning; the bottom nibble always reads as zero.
///
/// Flags combine like a bitset, so `Flags::ZERO | Flags::CARRY` is a valid value. Instructions
/// should only ever touch the bits that they affect, which is why the `set`/`insert`/`remove`
/// methods exist rather than assigning a whole new value.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    derive_more::BitOr,
    derive_more::BitOrAssign,
    derive_more::BitAnd,
    derive_more::BitAndAssign,
    derive_more::BitXor,
    derive_more::BitXorAssign,
    Serialize,
    Deserialize,
)]
#[serde(from = "u8", into = "u8")]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Self = Self(0);
    /// Set when the result of an operation is zero.
    pub const ZERO: Self = Self(0x80);
    /// Set when the last operation was a subtraction. Also called the "operation" flag.
    pub const SUBTRACT: Self = Self(0x40);
    /// Set when there was a carry out of the low nibble.
    pub const HALF_CARRY: Self = Self(0x20);
    /// Set when there was a carry out of the high bit.
    pub const CARRY: Self = Self(0x10);

    const MASK: u8 = 0xF0;

    /// Constructs flags from the raw F byte, dropping the bottom nibble.
    pub const fn from_byte(val: u8) -> Self {
        Self(val & Self::MASK)
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets or clears the given flags while leaving every other flag untouched.
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other)
        } else {
            self.remove(other)
        }
    }

    /// Used by rotates and shifts, which all set Z and C from the result and clear N and H.
    pub fn set_for_byte_shift_op(&mut self, z: bool, c: bool) {
        self.set(Self::ZERO, z);
        self.remove(Self::SUBTRACT | Self::HALF_CARRY);
        self.set(Self::CARRY, c);
    }

    /// Returns the value of the Z flag
    pub const fn z(self) -> bool {
        self.contains(Self::ZERO)
    }

    /// Returns the value of the N flag
    pub const fn n(self) -> bool {
        self.contains(Self::SUBTRACT)
    }

    /// Returns the value of the H flag
    pub const fn h(self) -> bool {
        self.contains(Self::HALF_CARRY)
    }

    /// Returns the value of the C flag
    pub const fn c(self) -> bool {
        self.contains(Self::CARRY)
    }
}

impl Not for Flags {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0 & Self::MASK)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flags(Z={} N={} H={} C={})",
            self.z() as u8,
            self.n() as u8,
            self.h() as u8,
            self.c() as u8
        )
    }
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl From<Flags> for u8 {
    fn from(value: Flags) -> Self {
        value.0
    }
}
