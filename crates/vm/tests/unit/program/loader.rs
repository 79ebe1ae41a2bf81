//! # Loader Tests
//!
//! Parsing of program text and files, and every load-time diagnostic.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use stepvm_core::common::{Addr, LoadError};
use stepvm_core::isa::{Instruction, Opcode};
use stepvm_core::program::{CellDecl, CellInit, loader};

use crate::common::harness::{FACTORIAL, SUM};

fn parse_err(text: &str) -> LoadError {
    loader::parse(text).unwrap_err()
}

#[test]
fn test_parse_sum_program() {
    let program = loader::parse(SUM).unwrap();
    assert_eq!(program.entry(), Addr(0));
    assert_eq!(program.end(), Addr(2));
    assert_eq!(
        program.cells(),
        &[
            CellDecl::value(Addr(0x10), 5),
            CellDecl::value(Addr(0x11), 3),
            CellDecl::value(Addr(0x12), 0),
        ]
    );
    assert_eq!(
        program.instructions(),
        &[
            Instruction::new(Opcode::Add, Addr(0x10), Addr(0x11), Addr(0x12)),
            Instruction::new(Opcode::Halt, Addr(0), Addr(0), Addr(0)),
        ]
    );
}

#[test]
fn test_input_cells_are_marked() {
    let program = loader::parse(FACTORIAL).unwrap();
    assert_eq!(program.cells()[0].init, CellInit::Input);
    assert_eq!(program.input_cells().collect::<Vec<_>>(), vec![Addr(0x20)]);
}

#[test]
fn test_compact_and_prefixed_tokens() {
    let program = loader::parse("0x100\n10=-5 11<\n0x99 0 0 0").unwrap();
    assert_eq!(program.entry(), Addr(0x100));
    assert_eq!(program.cells()[0], CellDecl::value(Addr(0x10), -5));
    assert_eq!(program.cells()[1], CellDecl::input(Addr(0x11)));
    assert_eq!(program.instructions()[0].opcode, Opcode::Halt);
    assert_eq!(program.address_of(0), Some(Addr(0x100)));
}

#[test]
fn test_empty_instruction_list_is_accepted() {
    let program = loader::parse("0\n10 = 1\n").unwrap();
    assert!(program.instructions().is_empty());
    assert_eq!(program.end(), program.entry());
}

#[test]
fn test_blank_lines_between_instructions_are_skipped() {
    let program = loader::parse("0\n\n00 10 0 11\n\n99 0 0 0\n").unwrap();
    assert_eq!(program.instructions().len(), 2);
}

#[test]
fn test_missing_entry() {
    assert!(matches!(parse_err(""), LoadError::MissingEntry));
    assert!(matches!(parse_err("zz\n"), LoadError::MissingEntry));
}

#[test]
fn test_entry_out_of_range() {
    assert!(matches!(parse_err("10000\n"), LoadError::AddressSpaceExhausted));
}

#[test]
fn test_duplicate_cell() {
    let err = parse_err("0\n10 = 1\n10 = 2\n99 0 0 0\n");
    assert!(matches!(err, LoadError::DuplicateCell { addr } if addr == Addr(0x10)));
}

#[test]
fn test_cell_out_of_range() {
    let err = parse_err("0\n10000 = 1\n");
    assert!(matches!(err, LoadError::CellOutOfRange { value: 0x10000 }));
}

#[test]
fn test_garbled_value() {
    let err = parse_err("0\n10 = abc\n");
    assert!(matches!(err, LoadError::InvalidAssignment { addr } if addr == Addr(0x10)));
}

#[test]
fn test_value_too_large_for_cell() {
    let err = parse_err("0\n10 = 4294967296\n");
    assert!(matches!(err, LoadError::InvalidAssignment { .. }));
}

#[test]
fn test_input_ends_after_address() {
    let err = parse_err("0\n10 = 1\n11");
    assert!(matches!(err, LoadError::InvalidAssignment { addr } if addr == Addr(0x11)));
}

#[test]
fn test_invalid_token_reports_line() {
    let err = parse_err("0\n10 = 1\nzz 0 0 0\n");
    match err {
        LoadError::InvalidToken { line, token } => {
            assert_eq!(line, 3);
            assert_eq!(token, "zz");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_opcode() {
    let err = parse_err("0\n99 0 0 0\n07 0 0 0\n");
    assert!(matches!(err, LoadError::InvalidOpcode { line: 3, code: 7 }));
    assert_eq!(err.to_string(), "invalid opcode on line 3: 7");
}

#[test]
fn test_malformed_instruction() {
    assert!(matches!(
        parse_err("0\n01 0 0\n"),
        LoadError::MalformedInstruction { line: 2 }
    ));
    assert!(matches!(
        parse_err("0\n01 0 0 0 0\n"),
        LoadError::MalformedInstruction { line: 2 }
    ));
    assert!(matches!(
        parse_err("0\n99 0 0 0\n01 0 0 xyz\n"),
        LoadError::MalformedInstruction { line: 3 }
    ));
}

#[test]
fn test_instruction_errors_count_file_lines() {
    // Declarations and blank lines count like any other line.
    let err = parse_err("0\n10 = 1\n11 <\n99 0 0 0\n\n07 0 0 0\n");
    assert!(matches!(err, LoadError::InvalidOpcode { line: 6, code: 7 }));

    let err = parse_err("0\n10 = 1\nzz 0 0 0\n");
    assert!(matches!(err, LoadError::InvalidToken { line: 3, .. }));
}

#[test]
fn test_operand_out_of_range() {
    let err = parse_err("0\n01 0 0 10000\n");
    assert!(matches!(
        err,
        LoadError::OperandOutOfRange {
            line: 2,
            operand: 3,
            value: 0x10000
        }
    ));
}

#[test]
fn test_overlap_is_rejected_before_execution() {
    let err = parse_err("0\n1 = 5\n99 0 0 0\n00 0 0 0\n");
    assert!(matches!(err, LoadError::Overlap { addr } if addr == Addr(1)));
}

#[test]
fn test_cell_just_past_program_does_not_overlap() {
    let program = loader::parse("0\n2 = 5\n99 0 0 0\n00 0 0 0\n").unwrap();
    assert_eq!(program.end(), Addr(2));
}

#[test]
fn test_address_space_exhausted() {
    assert!(matches!(
        parse_err("FFFF\n99 0 0 0\n"),
        LoadError::AddressSpaceExhausted
    ));
}

#[test]
fn test_load_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SUM.as_bytes()).unwrap();
    file.flush().unwrap();

    let program = loader::load_file(file.path()).unwrap();
    assert_eq!(program.instructions().len(), 2);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_file(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.txt"));
}
