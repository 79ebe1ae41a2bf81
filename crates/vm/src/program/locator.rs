//! Instruction locator.
//!
//! Maps a program-counter address to the index of the instruction that starts
//! there. Instruction starts are the running sum of widths from the entry
//! address, computed once when the program is built.
//!
//! Two failures are kept apart on purpose: an address just past the last
//! instruction means the program ran off its end without halting, anything
//! else means the program jumped into the void.

use super::Program;
use crate::common::{Addr, Fault};

/// Outcome of resolving an address against the instruction layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// An instruction starts at the address.
    At(usize),
    /// The address is exactly the end of the program.
    End,
    /// No instruction starts at the address.
    Missing,
}

/// Resolves `target` to an instruction position.
///
/// # Arguments
///
/// * `program` - The loaded program.
/// * `target` - Address to resolve.
pub fn locate(program: &Program, target: Addr) -> Location {
    match program.starts().binary_search(&target.wide()) {
        Ok(index) => Location::At(index),
        Err(_) if target == program.end() => Location::End,
        Err(_) => Location::Missing,
    }
}

/// Resolves `target` to an instruction index, folding both failures into a [`Fault`].
///
/// # Errors
///
/// * [`Fault::ForcedTermination`] if `target` is the end-of-program address.
/// * [`Fault::NoInstruction`] if no instruction starts at `target`.
pub fn resolve(program: &Program, target: Addr) -> Result<usize, Fault> {
    match locate(program, target) {
        Location::At(index) => Ok(index),
        Location::End => Err(Fault::ForcedTermination(target)),
        Location::Missing => Err(Fault::NoInstruction(target)),
    }
}
