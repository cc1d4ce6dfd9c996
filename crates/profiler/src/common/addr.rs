//! Code address type.
//!
//! Branch sources and targets are instruction addresses in the simulated
//! program. Wrapping them keeps them from being mixed up with lane counts and
//! cycle counters, which share the same primitive width.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An instruction address in the simulated program.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CodeAddr(pub u64);

impl CodeAddr {
    /// Creates a new code address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for CodeAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl From<CodeAddr> for u64 {
    fn from(addr: CodeAddr) -> Self {
        addr.0
    }
}

impl fmt::LowerHex for CodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for CodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
