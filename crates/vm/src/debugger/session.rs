//! Run session.
//!
//! A [`Session`] owns all per-run mutable state: the working cell values, the
//! execution history and the frontier status. It only ever moves the frontier
//! forward; replaying old rows is the controller's job. Reset discards the
//! session and builds a new one from the same program, with new or reused inputs.

use std::sync::Arc;

use tracing::{info, trace, warn};

use crate::common::{RunError, StartError};
use crate::config::Config;
use crate::engine::{self, Step};
use crate::history::{History, Snapshot};
use crate::isa::disasm::disassemble;
use crate::program::{Inputs, Memory, Program};
use crate::stats::RunStats;

use super::view::StatusMessage;

/// How far execution has progressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontierStatus {
    /// More instructions can be executed.
    Running,
    /// The halt instruction ran.
    HaltedOk,
    /// Execution stopped on a fault, a detected loop or the step budget.
    HaltedError(RunError),
}

impl FrontierStatus {
    /// Returns `true` once execution can no longer continue.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// The message for a terminal status.
    pub fn message(&self) -> Option<StatusMessage> {
        match self {
            Self::Running => None,
            Self::HaltedOk => Some(StatusMessage::success()),
            Self::HaltedError(err) => Some(StatusMessage::error(err.to_string())),
        }
    }
}

/// State of one run of a program.
#[derive(Debug)]
pub struct Session {
    program: Arc<Program>,
    memory: Memory,
    history: History,
    status: FrontierStatus,
    stats: RunStats,
    trace_steps: bool,
}

impl Session {
    /// Starts a run and records the snapshot at the entry address.
    ///
    /// # Arguments
    ///
    /// * `program` - The loaded program, shared with later sessions.
    /// * `inputs` - Values for the externally supplied cells.
    /// * `config` - History and tracing settings.
    ///
    /// # Errors
    ///
    /// * [`StartError::Config`] if `config` fails [`Config::validate`].
    /// * [`StartError::MissingInput`] if `inputs` lacks a value for an input cell.
    pub fn new(
        program: Arc<Program>,
        inputs: &Inputs,
        config: &Config,
    ) -> Result<Self, StartError> {
        config.validate()?;
        let memory = program.initial_memory(inputs)?;
        let mut history = History::new(&config.history);
        let status = match history.append(Snapshot::new(0, program.entry(), memory.values())) {
            Ok(()) => FrontierStatus::Running,
            Err(stop) => FrontierStatus::HaltedError(stop.into()),
        };
        info!(
            entry = %program.entry(),
            cells = memory.len(),
            instructions = program.instructions().len(),
            "session started"
        );
        Ok(Self {
            program,
            memory,
            history,
            status,
            stats: RunStats::default(),
            trace_steps: config.general.trace_steps,
        })
    }

    /// Executes the frontier instruction and records the result.
    ///
    /// Does nothing once the status is terminal. A fault leaves the history
    /// untouched; a loop or budget stop keeps the snapshot that triggered it.
    pub fn execute_next(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        let Some(frontier) = self.history.last() else {
            return;
        };
        let (index, pc) = (frontier.index, frontier.pc);
        let inst = self.program.instruction(index).copied();

        if self.trace_steps {
            if let Some(inst) = &inst {
                trace!(pc = %pc, row = self.history.len() - 1, "{}", disassemble(inst));
            }
        }

        match engine::execute(&self.program, &mut self.memory, index) {
            Ok(Step::Halt) => {
                if let Some(inst) = &inst {
                    self.stats.record(inst, false);
                }
                info!(pc = %pc, steps = self.history.len(), "program halted");
                self.status = FrontierStatus::HaltedOk;
            }
            Ok(Step::Continue { index, pc, jumped }) => {
                if let Some(inst) = &inst {
                    self.stats.record(inst, jumped);
                }
                let snapshot = Snapshot::new(index, pc, self.memory.values());
                if let Err(stop) = self.history.append(snapshot) {
                    self.status = FrontierStatus::HaltedError(stop.into());
                }
            }
            Err(fault) => {
                warn!(pc = %pc, %fault, "run-time fault");
                self.status = FrontierStatus::HaltedError(fault.into());
            }
        }
    }

    /// Executes until the status becomes terminal.
    ///
    /// Terminates because every step either stops the run or grows the
    /// history towards the step budget.
    pub fn run_to_completion(&mut self) {
        while !self.status.is_terminal() {
            self.execute_next();
        }
    }

    /// The program being run.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Shared handle to the program.
    pub fn program_handle(&self) -> Arc<Program> {
        Arc::clone(&self.program)
    }

    /// Recorded snapshots.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Current frontier status.
    pub const fn status(&self) -> &FrontierStatus {
        &self.status
    }

    /// Returns `true` while instructions can still be executed.
    pub const fn is_running(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Counters for this run.
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(crate) const fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }
}
