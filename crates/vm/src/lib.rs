//! Rewindable three-address virtual machine library.
//!
//! This crate loads small textual programs and executes them one instruction at a
//! time under an interactive, rewindable debugger. It provides:
//! 1. **Program:** Loader, immutable program store, and instruction locator.
//! 2. **Engine:** Single-step execution of the 19-code instruction set.
//! 3. **History:** Append-only snapshots with loop detection and a step budget.
//! 4. **Debugger:** The stepping controller, run sessions, and the presentation model.
//! 5. **Support:** Configuration, run statistics, and disassembly.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use stepvm_core::debugger::session::FrontierStatus;
//! use stepvm_core::program::{Inputs, loader};
//! use stepvm_core::{Config, Controller};
//!
//! let program = loader::parse("0\n10 = 5\n11 = 3\n12 = 0\n01 10 11 12\n99 0 0 0\n").unwrap();
//! let mut vm = Controller::new(Arc::new(program), Inputs::new(), Config::default()).unwrap();
//! vm.run_to_completion();
//! assert_eq!(vm.status(), &FrontierStatus::HaltedOk);
//! assert_eq!(vm.row(vm.cursor()).unwrap().values, &[5, 3, 8]);
//! ```

/// Common types and constants (addresses, limits, errors).
pub mod common;
/// Configuration (defaults and hierarchical config structures).
pub mod config;
/// Stepping controller, sessions, and the presentation model.
pub mod debugger;
/// Single-instruction execution engine.
pub mod engine;
/// Execution history and loop detection.
pub mod history;
/// Instruction set (opcodes, instructions, disassembly).
pub mod isa;
/// Program store, loader, and instruction locator.
pub mod program;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Stepping controller; the entry point for driving a run.
pub use crate::debugger::Controller;
/// Immutable loaded program.
pub use crate::program::Program;
