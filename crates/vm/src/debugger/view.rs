//! Presentation model.
//!
//! Everything a front end needs to draw the debugger, without any formatting:
//! 1. **View Mode:** Windowed (a scrolling slice of rows) or full (every row).
//! 2. **Viewport:** The scroll position of the windowed view.
//! 3. **Rows:** One [`RowView`] per visible snapshot with change flags and markers.
//! 4. **Status:** The terminal message attached to the frontier row.

use std::ops::Range;

use crate::common::Addr;
use crate::isa::Instruction;

/// How many history rows the front end shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// A fixed-height window that follows the cursor, with the program listing.
    #[default]
    Windowed,
    /// Every recorded row.
    Full,
}

impl ViewMode {
    /// The other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Windowed => Self::Full,
            Self::Full => Self::Windowed,
        }
    }
}

/// Scroll state of the windowed view.
///
/// The window only moves when the cursor leaves it: up to the cursor when the
/// cursor goes above, or just far enough to keep it on the last line when it
/// goes below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    rows: usize,
    start: usize,
}

impl Viewport {
    /// Creates a window of `rows` lines scrolled to the top.
    pub const fn new(rows: usize) -> Self {
        Self { rows, start: 0 }
    }

    /// First row of the window.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Height of the window.
    pub const fn height(&self) -> usize {
        self.rows
    }

    /// Scrolls the minimum amount needed to show `cursor`.
    pub const fn follow(&mut self, cursor: usize) {
        if cursor < self.start {
            self.start = cursor;
        } else if cursor >= self.start + self.rows {
            self.start = cursor + 1 - self.rows;
        }
    }

    /// Row indices to draw.
    ///
    /// In windowed mode the range is always `height()` long; indices at or past
    /// `len` are blank filler lines.
    ///
    /// # Arguments
    ///
    /// * `mode` - Current view mode.
    /// * `len` - Number of recorded rows.
    pub const fn range(&self, mode: ViewMode, len: usize) -> Range<usize> {
        match mode {
            ViewMode::Windowed => self.start..self.start + self.rows,
            ViewMode::Full => 0..len,
        }
    }
}

/// Whether a status message reports success or failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The run stopped abnormally.
    Error,
    /// The run halted normally.
    Success,
}

/// Text shown next to the frontier row once the run has stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Success or error.
    pub severity: Severity,
}

impl StatusMessage {
    /// Message for a normal halt.
    pub fn success() -> Self {
        Self {
            text: "successfully finished".to_string(),
            severity: Severity::Success,
        }
    }

    /// Message for an abnormal stop.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

/// One displayed history row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView<'a> {
    /// History index.
    pub row: usize,
    /// Program counter of the row.
    pub pc: Addr,
    /// Instruction at `pc`; `None` only for an empty program.
    pub instruction: Option<&'a Instruction>,
    /// Cell values in column order.
    pub values: &'a [i32],
    /// Per cell, whether the value differs from the previous row.
    pub changed: Vec<bool>,
    /// The cursor is on this row.
    pub is_cursor: bool,
    /// This is the frontier row of a run that stopped with an error.
    pub errored: bool,
    /// Terminal message, present only on the frontier row while the cursor is on it.
    pub message: Option<StatusMessage>,
}

/// Compares two value vectors column by column.
pub(crate) fn changed_flags(previous: Option<&[i32]>, current: &[i32]) -> Vec<bool> {
    match previous {
        Some(prev) => current.iter().zip(prev).map(|(c, p)| c != p).collect(),
        None => vec![false; current.len()],
    }
}
