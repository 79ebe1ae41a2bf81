//! Program store.
//!
//! A [`Program`] is built once at load time and never changes afterwards. It holds:
//! 1. **Entry Point:** The address of the first instruction.
//! 2. **Instructions:** The ordered instruction sequence and each instruction's start address.
//! 3. **Cell Declarations:** The memory image in declaration order, with an address index.
//!
//! Runs never write to the program; they copy its cell values into a [`Memory`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::common::constants::ADDRESS_SPACE;
use crate::common::{Addr, LoadError, MissingInput};
use crate::isa::Instruction;

/// Program text loader.
pub mod loader;

/// Program-counter to instruction-index resolution.
pub mod locator;

/// Mutable per-run cell values.
pub mod memory;

pub use memory::Memory;

/// How a declared cell gets its value at run start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellInit {
    /// Fixed value written in the program text (`addr = value`).
    Value(i32),
    /// Value supplied by the user before execution (`addr <`).
    Input,
}

/// A declared memory cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDecl {
    /// Address of the cell.
    pub addr: Addr,
    /// Initial value source.
    pub init: CellInit,
}

impl CellDecl {
    /// Declares a cell with a fixed initial value.
    pub const fn value(addr: Addr, value: i32) -> Self {
        Self {
            addr,
            init: CellInit::Value(value),
        }
    }

    /// Declares a cell whose value is supplied at run start.
    pub const fn input(addr: Addr) -> Self {
        Self {
            addr,
            init: CellInit::Input,
        }
    }
}

/// Values for the externally supplied cells, keyed by address.
pub type Inputs = HashMap<Addr, i32>;

/// Supplies values for externally supplied cells, typically by asking the user.
pub trait InputSource {
    /// Value for the input cell at `addr`, or `None` if none can be obtained.
    fn value_for(&mut self, addr: Addr) -> Option<i32>;
}

/// An immutable, validated program.
#[derive(Clone, Debug)]
pub struct Program {
    entry: Addr,
    instructions: Vec<Instruction>,
    starts: Vec<u32>,
    end: u32,
    cells: Vec<CellDecl>,
    columns: HashMap<Addr, usize>,
}

impl Program {
    /// Builds a program, checking the layout invariants.
    ///
    /// # Arguments
    ///
    /// * `entry` - Address of the first instruction.
    /// * `instructions` - Instruction sequence in control-flow order.
    /// * `cells` - Cell declarations in column order.
    ///
    /// # Errors
    ///
    /// * [`LoadError::DuplicateCell`] if two declarations share an address.
    /// * [`LoadError::AddressSpaceExhausted`] if the instructions run past the top of memory.
    /// * [`LoadError::Overlap`] if a cell address falls inside the instruction range.
    pub fn new(
        entry: Addr,
        instructions: Vec<Instruction>,
        cells: Vec<CellDecl>,
    ) -> Result<Self, LoadError> {
        let mut columns = HashMap::with_capacity(cells.len());
        for (col, cell) in cells.iter().enumerate() {
            match columns.entry(cell.addr) {
                Entry::Occupied(_) => return Err(LoadError::DuplicateCell { addr: cell.addr }),
                Entry::Vacant(slot) => {
                    let _ = slot.insert(col);
                }
            }
        }

        let mut starts = Vec::with_capacity(instructions.len());
        let mut cursor = entry.wide();
        for inst in &instructions {
            starts.push(cursor);
            cursor += u32::from(inst.width);
            if cursor >= ADDRESS_SPACE {
                return Err(LoadError::AddressSpaceExhausted);
            }
        }
        let end = cursor;

        if let Some(cell) = cells
            .iter()
            .find(|c| c.addr.wide() >= entry.wide() && c.addr.wide() < end)
        {
            return Err(LoadError::Overlap { addr: cell.addr });
        }

        Ok(Self {
            entry,
            instructions,
            starts,
            end,
            cells,
            columns,
        })
    }

    /// Address of the first instruction.
    pub const fn entry(&self) -> Addr {
        self.entry
    }

    /// Address just past the last instruction.
    ///
    /// The loader guarantees this is below the top of the address space.
    pub const fn end(&self) -> Addr {
        Addr(self.end as u16)
    }

    /// The instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The instruction at `index`, if any.
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Start address of the instruction at `index`.
    pub fn address_of(&self, index: usize) -> Option<Addr> {
        self.starts.get(index).map(|&a| Addr(a as u16))
    }

    /// Start addresses of all instructions, ascending.
    pub(crate) fn starts(&self) -> &[u32] {
        &self.starts
    }

    /// Cell declarations in column order.
    pub fn cells(&self) -> &[CellDecl] {
        &self.cells
    }

    /// Column of the cell declared at `addr`, if any.
    pub fn column_of(&self, addr: Addr) -> Option<usize> {
        self.columns.get(&addr).copied()
    }

    /// Addresses of cells whose value must be supplied before running.
    pub fn input_cells(&self) -> impl Iterator<Item = Addr> + '_ {
        self.cells
            .iter()
            .filter(|c| c.init == CellInit::Input)
            .map(|c| c.addr)
    }

    /// Asks `source` for every input cell, in declaration order.
    ///
    /// # Arguments
    ///
    /// * `source` - Asked once per input cell.
    /// * `fallback` - Used for a cell `source` has no value for.
    ///
    /// # Errors
    ///
    /// Returns [`MissingInput`] for the first cell neither `source` nor
    /// `fallback` can supply.
    pub fn gather_inputs(
        &self,
        source: &mut dyn InputSource,
        fallback: &Inputs,
    ) -> Result<Inputs, MissingInput> {
        self.input_cells()
            .map(|addr| {
                source
                    .value_for(addr)
                    .or_else(|| fallback.get(&addr).copied())
                    .map(|value| (addr, value))
                    .ok_or(MissingInput(addr))
            })
            .collect()
    }

    /// Builds the initial cell values for a run.
    ///
    /// # Errors
    ///
    /// Returns [`MissingInput`] naming the first externally supplied cell
    /// that `inputs` has no value for.
    pub fn initial_memory(&self, inputs: &Inputs) -> Result<Memory, MissingInput> {
        let values = self
            .cells
            .iter()
            .map(|cell| match cell.init {
                CellInit::Value(v) => Ok(v),
                CellInit::Input => inputs.get(&cell.addr).copied().ok_or(MissingInput(cell.addr)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Memory::new(values))
    }
}
