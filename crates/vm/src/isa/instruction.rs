//! Decoded instruction representation.
//!
//! Instructions are stored already decoded: the loader validates the opcode and
//! the three operand addresses once, so the engine never sees a raw line.

use std::fmt;

use super::opcode::Opcode;
use crate::common::Addr;
use crate::common::constants::INSTRUCTION_WIDTH;

/// A three-address instruction.
///
/// `arg1` and `arg2` are source cells. `arg3` is the destination cell, or the
/// absolute target address when the opcode is a jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Operation to perform.
    pub opcode: Opcode,
    /// First source operand.
    pub arg1: Addr,
    /// Second source operand.
    pub arg2: Addr,
    /// Destination operand or jump target.
    pub arg3: Addr,
    /// Number of address slots this instruction occupies.
    pub width: u16,
}

impl Instruction {
    /// Creates an instruction of the standard width.
    ///
    /// # Arguments
    ///
    /// * `opcode` - The operation.
    /// * `arg1` - First source operand.
    /// * `arg2` - Second source operand.
    /// * `arg3` - Destination operand or jump target.
    pub const fn new(opcode: Opcode, arg1: Addr, arg2: Addr, arg3: Addr) -> Self {
        Self {
            opcode,
            arg1,
            arg2,
            arg3,
            width: INSTRUCTION_WIDTH,
        }
    }
}

impl fmt::Display for Instruction {
    /// Formats the instruction the way it appears in program text:
    /// `01 0010 0011 0012`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:04X} {:04X} {:04X}",
            self.opcode,
            self.arg1.val(),
            self.arg2.val(),
            self.arg3.val()
        )
    }
}
