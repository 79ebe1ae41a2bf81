//! Common utilities and types used throughout the virtual machine.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Address Type:** A strong type for locations in the 16-bit address space.
//! 2. **Constants:** Address-space size, hash parameters, and debugger thresholds.
//! 3. **Error Handling:** Load errors, run-time faults, history stops, and config errors.

/// Address type definition.
pub mod addr;

/// Common constants used throughout the machine.
pub mod constants;

/// Error types for loading, execution, and configuration.
pub mod error;

pub use addr::Addr;
pub use error::{ConfigError, Fault, LoadError, MissingInput, RunError, StartError, Stop};
