//! Instruction Disassembler.
//!
//! Converts a decoded instruction into a human-readable mnemonic string for
//! trace logging and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use stepvm_core::common::Addr;
//! use stepvm_core::isa::disasm::disassemble;
//! use stepvm_core::isa::{Instruction, Opcode};
//!
//! let inst = Instruction::new(Opcode::Add, Addr(0x10), Addr(0x11), Addr(0x12));
//! assert_eq!(disassemble(&inst), "add [0x0010], [0x0011] -> [0x0012]");
//! ```

use super::instruction::Instruction;
use super::opcode::Family;

/// Disassembles an instruction into a mnemonic string.
///
/// Cell operands are shown in brackets, jump targets bare.
///
/// # Arguments
///
/// * `inst` - The decoded instruction.
pub fn disassemble(inst: &Instruction) -> String {
    let m = inst.opcode.mnemonic();
    let (a, b, c) = (inst.arg1, inst.arg2, inst.arg3);

    match inst.opcode.family() {
        Family::Halt => m.to_string(),
        Family::Move => format!("{m} [{a}] -> [{c}]"),
        Family::Add | Family::Sub | Family::Mul | Family::DivMod => {
            format!("{m} [{a}], [{b}] -> [{c}]")
        }
        Family::Jump => format!("{m} {c}"),
        Family::Branch(cond) => format!("{m} [{a}] {} [{b}] ? {c}", cond.symbol()),
    }
}
