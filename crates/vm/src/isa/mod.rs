//! Instruction set.
//!
//! The machine has a fixed three-address instruction set of 19 codes. This
//! module provides:
//! 1. **Opcodes:** The closed opcode enum, its semantic families, and operand usage.
//! 2. **Instructions:** The decoded instruction record stored by the program.
//! 3. **Disassembly:** Mnemonic rendering for logs and diagnostics.

/// Instruction disassembler for trace logging and diagnostics.
pub mod disasm;

/// Decoded instruction record.
pub mod instruction;

/// Opcode table and semantic families.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{Condition, Family, Opcode};
