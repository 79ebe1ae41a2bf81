//! Machine address type.
//!
//! This module defines the strong type used for every location in the 16-bit
//! address space. It provides the following:
//! 1. **Type Safety:** Keeps addresses apart from cell values and instruction indices.
//! 2. **Range Checking:** Converts raw parsed numbers into addresses only when they fit.
//! 3. **Formatting:** Renders addresses the way diagnostics and the debugger show them (`0x0012`).

use std::fmt;

use super::constants::ADDRESS_SPACE;

/// An address in the machine's 16-bit address space.
///
/// Both memory cells and instructions live in this space; the loader guarantees
/// the two never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Addr(pub u16);

impl Addr {
    /// Creates an address from a raw 16-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw address value.
    #[inline(always)]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Converts a raw parsed value into an address, or `None` if it lies
    /// outside `[0, 2^16)`.
    ///
    /// # Arguments
    ///
    /// * `raw` - Any unsigned value read from program text or computed by the engine.
    pub fn checked(raw: u32) -> Option<Self> {
        if raw < ADDRESS_SPACE {
            Some(Self(raw as u16))
        } else {
            None
        }
    }

    /// Returns the raw address value.
    #[inline(always)]
    pub const fn val(self) -> u16 {
        self.0
    }

    /// Returns the address widened for offset arithmetic.
    #[inline(always)]
    pub const fn wide(self) -> u32 {
        self.0 as u32
    }

    /// Returns the address immediately after this one, if it exists.
    ///
    /// Used to find the remainder cell of a divide instruction.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

impl From<u16> for Addr {
    fn from(addr: u16) -> Self {
        Self(addr)
    }
}
