//! # Unit Components
//!
//! Tests organized by the crate module they exercise.

/// Configuration defaults, parsing and validation.
pub mod config;



/// Snapshot history, hashing and loop detection.
pub mod history;

/// Opcode table and disassembly.
pub mod isa;
