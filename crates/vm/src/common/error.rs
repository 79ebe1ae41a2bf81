//! Load, Fault and Stop definitions.
//!
//! This module defines every error the virtual machine can report. It provides:
//! 1. **Load Errors:** Diagnostics for malformed or invalid program text.
//! 2. **Faults:** Run-time failures raised by the engine or the instruction locator.
//! 3. **Stops:** Conditions raised by the execution history (loops, step budget).
//! 4. **Configuration Errors:** Failures while reading or validating a `Config`.
//!
//! The `Display` rendering of a fault or stop is exactly the status message the
//! debugger attaches to the frontier row.

use std::io;

use thiserror::Error;

use super::addr::Addr;

/// A failure while turning program text into a [`Program`](crate::program::Program).
///
/// Loading is all-or-nothing: any of these means no program was produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("couldn't open file \"{path}\": {source}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The leading entry address is missing or not hexadecimal.
    #[error("couldn't read program memory start")]
    MissingEntry,

    /// A token in the declaration section is not a hexadecimal address.
    #[error("invalid format on line {line}: unexpected token `{token}`")]
    InvalidToken {
        /// 1-based line in the source text.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A declared cell address lies outside the address space.
    #[error("invalid pointer format: {value:x}")]
    CellOutOfRange {
        /// The raw parsed address.
        value: u64,
    },

    /// The same cell address is declared twice.
    #[error("double cell definition: {addr}")]
    DuplicateCell {
        /// The repeated address.
        addr: Addr,
    },

    /// A declaration has an operator but no usable value.
    #[error("invalid memory assignation of {addr}")]
    InvalidAssignment {
        /// The cell being declared.
        addr: Addr,
    },

    /// An instruction line does not hold four hexadecimal fields.
    #[error("invalid instruction format on line {line}")]
    MalformedInstruction {
        /// 1-based line in the source text.
        line: usize,
    },

    /// An instruction uses a code outside the defined opcode set.
    #[error("invalid opcode on line {line}: {code:x}")]
    InvalidOpcode {
        /// 1-based line in the source text.
        line: usize,
        /// The rejected code.
        code: u64,
    },

    /// An instruction operand lies outside the address space.
    #[error("invalid arg{operand} value on line {line}: {value:x}")]
    OperandOutOfRange {
        /// 1-based line in the source text.
        line: usize,
        /// Which operand (1, 2 or 3).
        operand: usize,
        /// The raw parsed operand.
        value: u64,
    },

    /// The instructions do not fit between the entry address and the top of memory.
    #[error("not enough memory for program")]
    AddressSpaceExhausted,

    /// A declared cell sits inside the range occupied by instructions.
    #[error("collision of memory for cells and program at {addr}")]
    Overlap {
        /// The colliding cell address.
        addr: Addr,
    },
}

/// A cell declared as externally supplied was given no value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no input value supplied for cell {0}")]
pub struct MissingInput(pub Addr);

/// A failure while starting a run session.
#[derive(Debug, Error)]
pub enum StartError {
    /// The configuration cannot be run with.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An externally supplied cell has no value.
    #[error(transparent)]
    MissingInput(#[from] MissingInput),
}

/// A run-time failure raised while executing a single instruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// An operand refers to an address with no declared cell.
    #[error("undefined cell {0}")]
    UndefinedCell(Addr),

    /// A divide instruction found a zero divisor.
    #[error("trying to divide by zero")]
    DivisionByZero,

    /// The next program counter is not the start of any instruction.
    #[error("no instruction at {0}")]
    NoInstruction(Addr),

    /// The next program counter is just past the last instruction (no halt reached).
    #[error("forced to terminate at {0}")]
    ForcedTermination(Addr),
}

/// A condition raised by the execution history when a snapshot is appended.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Stop {
    /// The new snapshot repeats an earlier one exactly.
    #[error("infinite loop found: rows [{first} - {second}] at {pc}")]
    LoopDetected {
        /// History index of the earlier identical snapshot.
        first: usize,
        /// History index of the new snapshot.
        second: usize,
        /// Program counter shared by both snapshots.
        pc: Addr,
    },

    /// The history reached its configured maximum length.
    #[error("stopped after {steps} steps")]
    BudgetExceeded {
        /// History length when the budget tripped.
        steps: usize,
    },
}

/// Why a run stopped with an error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    /// The engine or locator failed.
    #[error(transparent)]
    Fault(#[from] Fault),
    /// The history detector stopped the run.
    #[error(transparent)]
    Stop(#[from] Stop),
}

/// A failure while reading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("couldn't read config \"{path}\": {source}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON for the schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field has a value the machine cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}
