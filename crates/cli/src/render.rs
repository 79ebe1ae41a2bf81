//! Screen rendering.
//!
//! Draws the debugger as plain lines: the program listing with key help (windowed
//! view only), the `Debugging:` status line, and a box-drawn table of history rows
//! with one column per cell. Column widths only ever grow, so the table does not
//! jitter while stepping.

use std::io::{self, Write, stdout};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};

use stepvm_core::Controller;
use stepvm_core::debugger::view::{RowView, Severity, ViewMode};

const LISTING: Color = Color::Rgb { r: 250, g: 180, b: 25 };
const ERROR: Color = Color::Rgb { r: 205, g: 49, b: 49 };
const SUCCESS: Color = Color::Rgb { r: 44, g: 124, b: 237 };
const CHANGED: Color = Color::Rgb { r: 50, g: 237, b: 44 };

const HINTS: [&str; 7] = [
    "Use keyboard to:",
    "(1) <enter> - move forward",
    "(2) <backspace> - move back",
    "(3) 'v' - change view mode (windowed/full)",
    "(4) 'r' - run the whole program without stopping",
    "(5) 't' - reset the program",
    "(6) 'e' - exit",
];

/// Width of `0x0000 : 01 0010 0011 0012`.
const COMMAND_WIDTH: usize = 26;
/// Width of a `0x0000` column header.
const CELL_MIN_WIDTH: usize = 6;

/// Frame builder with sticky column widths.
#[derive(Debug, Default)]
pub struct Renderer {
    widths: Vec<usize>,
}

impl Renderer {
    /// Draws a frame to the terminal, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be written.
    pub fn draw(&mut self, vm: &Controller, footer: Option<&str>) -> io::Result<()> {
        let mut lines = self.frame(vm);
        if let Some(text) = footer {
            lines.push(text.to_string());
        }
        write_frame(&mut stdout().lock(), &lines)
    }

    /// Draws the last frame of a session, with `stopped` as the status.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be written.
    pub fn draw_stopped(&mut self, vm: &Controller) -> io::Result<()> {
        let lines = self.stopped_frame(vm);
        write_frame(&mut stdout().lock(), &lines)
    }

    /// Builds the lines of one frame.
    pub fn frame(&mut self, vm: &Controller) -> Vec<String> {
        let status = vm.status_message().map_or_else(String::new, |msg| match msg.severity {
            Severity::Error => msg.text.with(ERROR).to_string(),
            Severity::Success => msg.text.with(SUCCESS).to_string(),
        });
        self.compose(vm, &status)
    }

    /// Builds the final frame shown when the user exits.
    pub fn stopped_frame(&mut self, vm: &Controller) -> Vec<String> {
        self.compose(vm, &"stopped".with(ERROR).to_string())
    }

    fn compose(&mut self, vm: &Controller, status: &str) -> Vec<String> {
        let rows = vm.rows();
        self.grow(vm, &rows);

        let mut lines = Vec::new();
        if vm.view_mode() == ViewMode::Windowed {
            listing(vm, &mut lines);
        }

        lines.push(String::new());
        lines.push(format!("Debugging: {status}"));
        lines.push(String::new());

        self.table(vm, &rows, &mut lines);
        lines
    }

    fn grow(&mut self, vm: &Controller, rows: &[RowView<'_>]) {
        let cells = vm.program().cells().len();
        if self.widths.len() != cells {
            self.widths = vec![CELL_MIN_WIDTH; cells];
        }
        for row in rows {
            for (width, value) in self.widths.iter_mut().zip(row.values) {
                *width = (*width).max(value.to_string().len());
            }
        }
    }

    fn border(&self, left: &str, mid: &str, right: &str) -> String {
        let mut line = String::from(left);
        line.push_str(&"═".repeat(COMMAND_WIDTH + 2));
        for width in &self.widths {
            line.push_str(mid);
            line.push_str(&"═".repeat(width + 2));
        }
        line.push_str(right);
        line
    }

    fn blank(&self) -> String {
        let mut line = format!("║{}", " ".repeat(COMMAND_WIDTH + 2));
        for width in &self.widths {
            line.push('║');
            line.push_str(&" ".repeat(width + 2));
        }
        line.push('║');
        line
    }

    fn table(&self, vm: &Controller, rows: &[RowView<'_>], lines: &mut Vec<String>) {
        lines.push(self.border("╔", "╦", "╗"));

        let mut header = format!(
            "║ {}{}",
            "Command".bold(),
            " ".repeat(COMMAND_WIDTH - "Command".len())
        );
        for (cell, width) in vm.program().cells().iter().zip(&self.widths) {
            header.push_str(&format!(" ║ {:<width$}", cell.addr.to_string()));
        }
        header.push_str(" ║");
        lines.push(header);

        let range = vm.visible_range();
        let mut shown = rows.iter().peekable();
        for index in range {
            lines.push(self.border("╠", "╬", "╣"));
            match shown.next_if(|r| r.row == index) {
                Some(row) => lines.push(self.row_line(row)),
                None => lines.push(self.blank()),
            }
        }

        lines.push(self.border("╚", "╩", "╝"));
    }

    fn row_line(&self, row: &RowView<'_>) -> String {
        let command = match row.instruction {
            Some(inst) => format!("{} : {inst}", row.pc),
            None => format!("{} : --", row.pc),
        };
        let mut line = format!("║ {command:<COMMAND_WIDTH$}");
        for ((value, changed), width) in row.values.iter().zip(&row.changed).zip(&self.widths) {
            let text = format!("{value:<width$}");
            let styled = if *changed {
                text.with(CHANGED).to_string()
            } else {
                text.bold().to_string()
            };
            line.push_str(" ║ ");
            line.push_str(&styled);
        }
        line.push_str(" ║");
        if row.is_cursor {
            line.push_str(" <-");
        }
        if row.errored {
            line.push_str(&" Error!".with(ERROR).to_string());
        }
        line
    }
}

/// Clears the screen and writes `lines` top to bottom.
///
/// Lines are written in sequence rather than placed by row, so a frame taller
/// than the terminal scrolls instead of overwriting its last line.
fn write_frame(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    crossterm::queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}

/// Program listing with the key help beside it.
fn listing(vm: &Controller, lines: &mut Vec<String>) {
    lines.push("Program:".with(LISTING).to_string());
    lines.push(String::new());

    let current = vm.session().history().at(vm.cursor()).map(|s| s.index);
    let instructions = vm.program().instructions();
    let height = instructions.len().max(HINTS.len());
    for i in 0..height {
        let code = instructions.get(i).map_or_else(
            || " ".repeat(17),
            |inst| {
                let text = inst.to_string();
                if current == Some(i) {
                    text.bold().with(Color::White).to_string()
                } else {
                    text.with(LISTING).to_string()
                }
            },
        );
        match HINTS.get(i) {
            Some(hint) => lines.push(format!("{code}           {hint}")),
            None => lines.push(code),
        }
    }
}
