//! Stepping controller.
//!
//! The controller turns discrete commands into session operations. It keeps
//! two positions apart:
//! 1. **Cursor:** The history row being viewed. Rewind and replayed advances only
//!    move the cursor; they never execute or touch the history.
//! 2. **Frontier:** The last recorded row. Execution only happens when the cursor
//!    is on the frontier and the run is still going.
//!
//! Commands that need the user's agreement (switching a very long trace to the
//! full view, resetting) ask through the [`Confirm`] trait, so front ends and
//! tests decide how the question is answered.

/// Per-run state.
pub mod session;

/// Presentation model for front ends.
pub mod view;

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::common::StartError;
use crate::config::Config;
use crate::program::{InputSource, Inputs, Program};

use session::{FrontierStatus, Session};
use view::{RowView, StatusMessage, ViewMode, Viewport, changed_flags};

/// A user command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Step forward: replay the next row, or execute one instruction at the frontier.
    Advance,
    /// Step back one row.
    Rewind,
    /// Switch between windowed and full view.
    ToggleView,
    /// Execute until the run stops.
    RunToCompletion,
    /// Start the program over.
    Reset,
    /// Leave the debugger.
    Exit,
}

impl Command {
    /// Every command, in help-text order.
    pub const ALL: [Self; 6] = [
        Self::Advance,
        Self::Rewind,
        Self::ToggleView,
        Self::RunToCompletion,
        Self::Reset,
        Self::Exit,
    ];
}

/// A question the controller needs answered before acting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Switch to the full view although it has `rows` rows.
    FullView {
        /// Number of rows the full view would show.
        rows: usize,
    },
    /// Discard the run and start over.
    Reset,
}

/// Answers yes/no prompts on behalf of the user.
pub trait Confirm {
    /// Returns `true` if the user agreed.
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

/// What the caller should do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// Stop the debugger.
    Exit,
}

/// The stepping controller.
#[derive(Debug)]
pub struct Controller {
    session: Session,
    inputs: Inputs,
    config: Config,
    cursor: usize,
    view: ViewMode,
    viewport: Viewport,
}

impl Controller {
    /// Creates a controller positioned on the entry snapshot.
    ///
    /// # Arguments
    ///
    /// * `program` - The loaded program.
    /// * `inputs` - Values for the externally supplied cells, kept across resets
    ///   that supply no new values.
    /// * `config` - Configuration, checked with [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`StartError`] if `config` is invalid or `inputs` lacks a value
    /// for an input cell.
    pub fn new(program: Arc<Program>, inputs: Inputs, config: Config) -> Result<Self, StartError> {
        let session = Session::new(program, &inputs, &config)?;
        let viewport = Viewport::new(config.debugger.window_rows);
        Ok(Self {
            session,
            inputs,
            config,
            cursor: 0,
            view: ViewMode::Windowed,
            viewport,
        })
    }

    /// Applies one command.
    ///
    /// # Arguments
    ///
    /// * `command` - The command to apply.
    /// * `confirm` - Asked before a large full view or a reset.
    pub fn handle(&mut self, command: Command, confirm: &mut dyn Confirm) -> Flow {
        match command {
            Command::Advance => self.advance(),
            Command::Rewind => self.rewind(),
            Command::ToggleView => self.toggle_view(confirm),
            Command::RunToCompletion => self.run_to_completion(),
            Command::Reset => self.reset(confirm),
            Command::Exit => {
                info!(rows = self.session.history().len(), "debugger exited");
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Moves forward one row, executing an instruction if the cursor is on the frontier.
    pub fn advance(&mut self) {
        let len = self.session.history().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
            self.session.stats_mut().replay_forward += 1;
            debug!(cursor = self.cursor, "replayed forward");
        } else if self.session.is_running() {
            self.session.execute_next();
            self.cursor = self.frontier();
        }
        self.viewport.follow(self.cursor);
    }

    /// Moves back one row without executing.
    pub fn rewind(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.session.stats_mut().replay_back += 1;
            debug!(cursor = self.cursor, "rewound");
        }
        self.viewport.follow(self.cursor);
    }

    /// Flips the view mode, asking first before showing a very long full view.
    pub fn toggle_view(&mut self, confirm: &mut dyn Confirm) {
        let rows = self.session.history().len();
        if self.view == ViewMode::Windowed
            && rows > self.config.debugger.full_view_threshold
            && !confirm.confirm(&Prompt::FullView { rows })
        {
            debug!(rows, "full view declined");
            return;
        }
        self.view = self.view.toggled();
        debug!(view = ?self.view, "view toggled");
    }

    /// Executes until the run stops, leaving the cursor on the frontier.
    ///
    /// Does nothing if the run has already stopped.
    pub fn run_to_completion(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.run_to_completion();
        self.cursor = self.frontier();
        self.viewport.follow(self.cursor);
        info!(rows = self.session.history().len(), "run finished");
    }

    /// Starts over with a fresh session and the same inputs, after confirmation.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) {
        if confirm.confirm(&Prompt::Reset) {
            let inputs = self.inputs.clone();
            self.restart(inputs);
        }
    }

    /// Starts over after confirmation, asking `source` for new input values.
    ///
    /// Cells `source` has no value for keep the value of the previous run.
    pub fn reset_with(&mut self, confirm: &mut dyn Confirm, source: &mut dyn InputSource) {
        if !confirm.confirm(&Prompt::Reset) {
            return;
        }
        match self.session.program().gather_inputs(source, &self.inputs) {
            Ok(inputs) => self.restart(inputs),
            Err(err) => error!(%err, "reset failed"),
        }
    }

    fn restart(&mut self, inputs: Inputs) {
        let program = self.session.program_handle();
        match Session::new(program, &inputs, &self.config) {
            Ok(session) => {
                self.session = session;
                self.inputs = inputs;
                self.cursor = 0;
                self.view = ViewMode::Windowed;
                self.viewport = Viewport::new(self.config.debugger.window_rows);
                info!("session reset");
            }
            Err(err) => error!(%err, "reset failed"),
        }
    }

    /// Input values of the current run.
    pub const fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Index of the row being viewed.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current view mode.
    pub const fn view_mode(&self) -> ViewMode {
        self.view
    }

    /// Scroll state of the windowed view.
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The current session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The loaded program.
    pub fn program(&self) -> &Program {
        self.session.program()
    }

    /// Frontier status of the current session.
    pub const fn status(&self) -> &FrontierStatus {
        self.session.status()
    }

    /// Returns `true` if the cursor is on the last recorded row.
    pub fn at_frontier(&self) -> bool {
        self.cursor == self.frontier()
    }

    /// The terminal message, shown only while the cursor is on the frontier.
    pub fn status_message(&self) -> Option<StatusMessage> {
        if self.at_frontier() {
            self.session.status().message()
        } else {
            None
        }
    }

    /// Commands that would currently change something.
    pub fn valid_commands(&self) -> Vec<Command> {
        let running = self.session.is_running();
        Command::ALL
            .into_iter()
            .filter(|cmd| match cmd {
                Command::Advance => !self.at_frontier() || running,
                Command::Rewind => self.cursor > 0,
                Command::RunToCompletion => running,
                Command::ToggleView | Command::Reset | Command::Exit => true,
            })
            .collect()
    }

    /// Row indices to draw; see [`Viewport::range`].
    pub fn visible_range(&self) -> Range<usize> {
        self.viewport.range(self.view, self.session.history().len())
    }

    /// The rows to draw, in order. Filler lines of the windowed view are omitted.
    pub fn rows(&self) -> Vec<RowView<'_>> {
        let len = self.session.history().len();
        let range = self.visible_range();
        (range.start..range.end.min(len))
            .filter_map(|i| self.row(i))
            .collect()
    }

    /// The presentation of history row `index`.
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        let history = self.session.history();
        let snapshot = history.at(index)?;
        let previous = index
            .checked_sub(1)
            .and_then(|i| history.at(i))
            .map(|s| &*s.values);
        let is_frontier = index == self.frontier();
        let is_cursor = index == self.cursor;
        Some(RowView {
            row: index,
            pc: snapshot.pc,
            instruction: self.session.program().instruction(snapshot.index),
            values: &snapshot.values,
            changed: changed_flags(previous, &snapshot.values),
            is_cursor,
            errored: is_frontier
                && matches!(self.session.status(), FrontierStatus::HaltedError(_)),
            message: if is_frontier && is_cursor {
                self.session.status().message()
            } else {
                None
            },
        })
    }

    fn frontier(&self) -> usize {
        self.session.history().len().saturating_sub(1)
    }
}
