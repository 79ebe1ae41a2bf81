//! Raw-mode terminal handling.
//!
//! Owns the terminal while the debugger is interactive: raw mode on entry,
//! restored on drop. Key presses are mapped to controller commands, and yes/no
//! prompts are answered with a single key.

use std::error::Error;
use std::io::{self, Write, stdout};

use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use stepvm_core::debugger::{Command, Confirm, Prompt};

/// Puts the terminal in raw mode for its lifetime.
#[derive(Debug)]
pub struct TerminalGuard;

impl TerminalGuard {
    /// Enables raw mode and clears the screen.
    ///
    /// # Errors
    ///
    /// Fails if the terminal refuses raw mode or the screen cannot be written.
    pub fn enter() -> Result<Self, Box<dyn Error>> {
        let mut out = stdout();
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(out, Hide, MoveTo(0, 0), Clear(ClearType::All))?;
        out.flush()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        let _ = crossterm::execute!(out, Show);
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Runs `f` with the terminal back in line mode, then re-enters raw mode.
///
/// # Errors
///
/// Fails if the terminal mode cannot be switched.
pub fn with_line_mode<T>(f: impl FnOnce() -> T) -> io::Result<T> {
    let mut out = stdout();
    crossterm::execute!(out, MoveToNextLine(1), Show)?;
    crossterm::terminal::disable_raw_mode()?;
    let value = f();
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(out, Hide)?;
    Ok(value)
}

/// Maps a key press to a debugger command.
///
/// Letters are case-insensitive; `Ctrl+C` exits.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Command::Exit);
    }
    match key.code {
        KeyCode::Enter => Some(Command::Advance),
        KeyCode::Backspace => Some(Command::Rewind),
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'e' => Some(Command::Exit),
            'v' => Some(Command::ToggleView),
            'r' => Some(Command::RunToCompletion),
            't' => Some(Command::Reset),
            _ => None,
        },
        _ => None,
    }
}

/// Blocks until a key mapped to a command is pressed.
///
/// # Errors
///
/// Fails if terminal events cannot be read.
pub fn read_command() -> io::Result<Command> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(command) = command_for(&key) {
                return Ok(command);
            }
        }
    }
}

/// Question text for a prompt.
pub fn prompt_text(prompt: &Prompt) -> String {
    match prompt {
        Prompt::FullView { rows } => format!("Are you sure to show {rows} rows? Press <y> or <n>"),
        Prompt::Reset => "Are you sure to reset? Press <y> or <n>".to_string(),
    }
}

/// Answers prompts from the keyboard: `y` agrees, any other key declines.
#[derive(Debug, Default)]
pub struct KeyConfirm;

impl KeyConfirm {
    fn ask(prompt: &Prompt) -> io::Result<bool> {
        let mut out = stdout();
        crossterm::queue!(out, MoveToNextLine(1), Clear(ClearType::CurrentLine))?;
        write!(out, "{}", prompt_text(prompt))?;
        out.flush()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(matches!(key.code, KeyCode::Char('y' | 'Y')));
                }
            }
        }
    }
}

impl Confirm for KeyConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        Self::ask(prompt).unwrap_or_else(|err| {
            warn!(%err, "prompt failed; treating as no");
            false
        })
    }
}
