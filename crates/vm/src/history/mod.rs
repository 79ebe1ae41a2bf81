//! Execution history and loop detection.
//!
//! The history is the append-only record of every state a run passes through.
//! It provides:
//! 1. **Snapshots:** One frozen `(instruction, pc, values)` row per executed step,
//!    plus the synthetic row recorded before the first instruction.
//! 2. **Loop Detection:** A hashed duplicate-state check on every append.
//! 3. **Step Budget:** A hard cap on history length that stops runaway programs.
//!
//! Stored snapshots are never modified; replaying the history is read-only.

/// Snapshot hashing and the loop table.
pub mod hash;

use tracing::warn;

use crate::common::{Addr, Stop};
use crate::config::HistoryConfig;

use hash::LoopTable;

/// Frozen machine state at one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Index of the instruction about to execute.
    pub index: usize,
    /// Address of that instruction.
    pub pc: Addr,
    /// Every cell value, in column order.
    pub values: Box<[i32]>,
}

impl Snapshot {
    /// Captures a snapshot.
    ///
    /// # Arguments
    ///
    /// * `index` - Index of the instruction at `pc`.
    /// * `pc` - Program counter.
    /// * `values` - Current cell values in column order (copied).
    pub fn new(index: usize, pc: Addr, values: &[i32]) -> Self {
        Self {
            index,
            pc,
            values: values.into(),
        }
    }

    /// Returns `true` if both snapshots describe the same machine state.
    ///
    /// The instruction index is implied by the pc, so only pc and values are compared.
    pub fn same_state(&self, other: &Self) -> bool {
        self.pc == other.pc && self.values == other.values
    }
}

/// Append-only snapshot store with loop and budget detection.
#[derive(Clone, Debug)]
pub struct History {
    rows: Vec<Snapshot>,
    table: LoopTable,
    max_len: usize,
}

impl History {
    /// Creates an empty history.
    ///
    /// # Arguments
    ///
    /// * `config` - Step budget and hash modulus.
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            rows: Vec::new(),
            table: LoopTable::new(config.hash_modulus),
            max_len: config.max_steps,
        }
    }

    /// Appends a snapshot and classifies the step.
    ///
    /// The snapshot is always stored, even when a stop is reported.
    ///
    /// # Errors
    ///
    /// * [`Stop::BudgetExceeded`] once the history holds `max_steps` snapshots.
    /// * [`Stop::LoopDetected`] if the snapshot repeats the state last recorded in
    ///   its hash bucket.
    pub fn append(&mut self, snapshot: Snapshot) -> Result<(), Stop> {
        let bucket = hash::state_hash(snapshot.pc, &snapshot.values, self.table.modulus());
        self.rows.push(snapshot);
        let index = self.rows.len() - 1;

        if self.rows.len() >= self.max_len {
            warn!(steps = self.rows.len(), "step budget exceeded");
            return Err(Stop::BudgetExceeded {
                steps: self.rows.len(),
            });
        }

        let previous = self.table.replace(bucket, index);
        if let Some(prev) = previous {
            let (earlier, latest) = (&self.rows[prev], &self.rows[index]);
            if earlier.same_state(latest) {
                warn!(first = prev, second = index, pc = %latest.pc, "loop detected");
                return Err(Stop::LoopDetected {
                    first: prev,
                    second: index,
                    pc: latest.pc,
                });
            }
        }

        Ok(())
    }

    /// Snapshot at `index`, if recorded.
    pub fn at(&self, index: usize) -> Option<&Snapshot> {
        self.rows.get(index)
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The frontier snapshot.
    pub fn last(&self) -> Option<&Snapshot> {
        self.rows.last()
    }

    /// All snapshots in order.
    pub fn rows(&self) -> &[Snapshot] {
        &self.rows
    }

    /// Drops every snapshot and empties the loop table.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.table.clear();
    }
}
