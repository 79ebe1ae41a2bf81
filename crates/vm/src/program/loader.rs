//! Program Loader.
//!
//! This module turns program text into a validated [`Program`]. It performs:
//! 1. **Entry parsing:** Reads the hexadecimal entry address.
//! 2. **Cell declarations:** Reads `addr = value` and `addr <` declarations until the
//!    first token that is not followed by an assignment operator.
//! 3. **Instruction parsing:** Reads one `opcode op1 op2 op3` line (all hexadecimal)
//!    per instruction until the end of input.
//! 4. **Validation:** Opcode whitelist, operand ranges, duplicate cells, and the
//!    program/data overlap check (see [`Program::new`]).
//!
//! # Format
//!
//! ```text
//! 0000
//! 0010 = 5
//! 0011 = 3
//! 0012 <
//! 01 0010 0011 0012
//! 99 0000 0000 0000
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::{CellDecl, Program};
use crate::common::constants::ADDRESS_SPACE;
use crate::common::{Addr, LoadError};
use crate::isa::{Instruction, Opcode};

/// Reads and parses a program file.
///
/// # Arguments
///
/// * `path` - Path to the program text.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, or any parse or
/// validation error from [`parse`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

/// Parses program text into a validated program.
///
/// # Arguments
///
/// * `text` - The whole program source.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered; no partial program is produced.
pub fn parse(text: &str) -> Result<Program, LoadError> {
    let mut scan = Scanner::new(text);

    let entry = scan.hex().ok_or(LoadError::MissingEntry)?;
    let entry = to_addr(entry).ok_or(LoadError::AddressSpaceExhausted)?;

    let cells = parse_cells(&mut scan)?;
    let first_line = scan.line();
    let instructions = parse_instructions(scan.rest(), first_line)?;

    debug!(
        entry = %entry,
        cells = cells.len(),
        instructions = instructions.len(),
        "program parsed"
    );
    Program::new(entry, instructions, cells)
}

/// Reads the declaration section, leaving the scanner on the first instruction token.
fn parse_cells(scan: &mut Scanner<'_>) -> Result<Vec<CellDecl>, LoadError> {
    let mut cells = Vec::new();
    let mut seen = HashSet::new();

    loop {
        scan.skip_ws();
        if scan.at_end() {
            break;
        }
        let mark = scan.pos;
        let line = scan.line();

        let Some(raw) = scan.hex() else {
            return Err(LoadError::InvalidToken {
                line,
                token: scan.token_at(mark).to_string(),
            });
        };

        scan.skip_ws();
        let op = match scan.next_char() {
            Some(c) => c,
            None => {
                return Err(match to_addr(raw) {
                    Some(addr) => LoadError::InvalidAssignment { addr },
                    None => LoadError::CellOutOfRange { value: raw },
                });
            }
        };

        if op != '=' && op != '<' {
            scan.pos = mark;
            break;
        }

        let addr = to_addr(raw).ok_or(LoadError::CellOutOfRange { value: raw })?;
        if !seen.insert(addr) {
            return Err(LoadError::DuplicateCell { addr });
        }

        if op == '=' {
            let value = scan
                .decimal()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or(LoadError::InvalidAssignment { addr })?;
            cells.push(CellDecl::value(addr, value));
        } else {
            cells.push(CellDecl::input(addr));
        }
    }

    Ok(cells)
}

/// Parses the instruction section, one instruction per non-blank line.
///
/// `first_line` is the file line `text` starts on, so errors name file lines.
fn parse_instructions(text: &str, first_line: usize) -> Result<Vec<Instruction>, LoadError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(offset, l)| parse_instruction(first_line + offset, l))
        .collect()
}

fn parse_instruction(line: usize, text: &str) -> Result<Instruction, LoadError> {
    let fields = text
        .split_whitespace()
        .map(parse_hex)
        .collect::<Option<Vec<_>>>()
        .ok_or(LoadError::MalformedInstruction { line })?;

    let &[code, a1, a2, a3] = fields.as_slice() else {
        return Err(LoadError::MalformedInstruction { line });
    };

    let opcode = u8::try_from(code)
        .ok()
        .and_then(Opcode::from_code)
        .ok_or(LoadError::InvalidOpcode { line, code })?;

    let operand = |operand: usize, value: u64| {
        to_addr(value).ok_or(LoadError::OperandOutOfRange {
            line,
            operand,
            value,
        })
    };

    Ok(Instruction::new(
        opcode,
        operand(1, a1)?,
        operand(2, a2)?,
        operand(3, a3)?,
    ))
}

/// Parses a hexadecimal token with an optional `0x` prefix.
fn parse_hex(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Range-checked conversion from a parsed 64-bit value.
fn to_addr(raw: u64) -> Option<Addr> {
    u32::try_from(raw)
        .ok()
        .filter(|&v| v < ADDRESS_SPACE)
        .and_then(Addr::checked)
}

/// Byte cursor over the declaration section.
///
/// Only ASCII is significant to the grammar; any other character simply ends
/// a token.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// 1-based line number of the current position.
    fn line(&self) -> usize {
        self.text[..self.pos].matches('\n').count() + 1
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            let _ = self.next_char();
        }
    }

    /// The whitespace-delimited token starting at `mark`.
    fn token_at(&self, mark: usize) -> &'a str {
        self.text[mark..]
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }

    /// Consumes the longest run of characters matching `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            let _ = self.next_char();
        }
        &self.text[start..self.pos]
    }

    /// Reads a hexadecimal number, skipping leading whitespace.
    ///
    /// On failure the position is left unchanged.
    fn hex(&mut self) -> Option<u64> {
        self.skip_ws();
        let mark = self.pos;
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
        }
        let digits = self.take_while(|c| c.is_ascii_hexdigit());
        match u64::from_str_radix(digits, 16) {
            Ok(v) if !digits.is_empty() => Some(v),
            _ => {
                self.pos = mark;
                None
            }
        }
    }

    /// Reads an optionally signed decimal number, skipping leading whitespace.
    fn decimal(&mut self) -> Option<i64> {
        self.skip_ws();
        let mark = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            let _ = self.next_char();
        }
        let _ = self.take_while(|c| c.is_ascii_digit());
        match self.text[mark..self.pos].parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.pos = mark;
                None
            }
        }
    }
}
