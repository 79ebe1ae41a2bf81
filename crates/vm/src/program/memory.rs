//! Per-run cell values.
//!
//! Values are stored by column (declaration order). Address lookup goes
//! through [`Program::column_of`](super::Program::column_of); this type only
//! knows columns.

/// Current value of every declared cell, in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    values: Vec<i32>,
}

impl Memory {
    /// Wraps a value vector.
    pub const fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// Value of the cell in column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col` is not a column of the program this memory was built from.
    #[inline]
    pub fn get(&self, col: usize) -> i32 {
        self.values[col]
    }

    /// Overwrites the cell in column `col`.
    #[inline]
    pub fn set(&mut self, col: usize, value: i32) {
        self.values[col] = value;
    }

    /// All values in column order.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the program declares no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
