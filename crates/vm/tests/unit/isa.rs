//! # Instruction Set Tests
//!
//! The opcode whitelist, alias families, operand usage and disassembly.

use pretty_assertions::assert_eq;

use stepvm_core::common::Addr;
use stepvm_core::isa::disasm::disassemble;
use stepvm_core::isa::{Condition, Family, Instruction, Opcode};

#[test]
fn test_exactly_nineteen_codes_are_defined() {
    let defined: Vec<u8> = (0..=u8::MAX)
        .filter(|&code| Opcode::from_code(code).is_some())
        .collect();
    assert_eq!(
        defined,
        vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x13, 0x14, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86,
            0x93, 0x94, 0x95, 0x96, 0x99,
        ]
    );
    for op in Opcode::ALL {
        assert_eq!(Opcode::from_code(op.code()), Some(op));
    }
}

#[test]
fn test_undefined_codes_are_rejected() {
    for code in [0x05_u8, 0x10, 0x12, 0x15, 0x87, 0x91, 0x92, 0x97, 0x98, 0xFF] {
        assert_eq!(Opcode::try_from(code), Err(code));
    }
}

#[test]
fn test_aliases_share_a_family() {
    for (primary, alias) in [
        (Opcode::Mul, Opcode::MulAlt),
        (Opcode::DivMod, Opcode::DivModAlt),
        (Opcode::JumpLt, Opcode::JumpLtAlt),
        (Opcode::JumpGe, Opcode::JumpGeAlt),
        (Opcode::JumpGt, Opcode::JumpGtAlt),
        (Opcode::JumpLe, Opcode::JumpLeAlt),
    ] {
        assert_eq!(primary.family(), alias.family());
        assert_ne!(primary.code(), alias.code());
    }
    assert_eq!(Opcode::JumpNe.family(), Family::Branch(Condition::Ne));
}

#[test]
fn test_operand_usage() {
    let branch = Opcode::JumpEq.operand_use();
    assert!(branch.src1 && branch.src2 && !branch.dest);

    let mov = Opcode::Move.operand_use();
    assert!(mov.src1 && mov.dest && !mov.src2);

    for op in [Opcode::Halt, Opcode::Jump] {
        let u = op.operand_use();
        assert!(!u.src1 && !u.src2 && !u.dest);
    }
    assert!(Opcode::Jump.is_jump());
    assert!(Opcode::JumpLeAlt.is_jump());
    assert!(!Opcode::DivMod.is_jump());
}

#[test]
fn test_conditions() {
    assert!(Condition::Le.holds(3, 3));
    assert!(!Condition::Lt.holds(3, 3));
    assert!(Condition::Ge.holds(-1, -2));
    assert!(Condition::Ne.holds(i32::MIN, i32::MAX));
}

#[test]
fn test_display_is_two_hex_digits() {
    assert_eq!(Opcode::Halt.to_string(), "99");
    assert_eq!(Opcode::Move.to_string(), "00");
    assert_eq!(Opcode::MulAlt.to_string(), "13");
}

#[test]
fn test_disassembly() {
    let a = |op| Instruction::new(op, Addr(0x10), Addr(0x11), Addr(0x12));
    assert_eq!(disassemble(&a(Opcode::Halt)), "halt");
    assert_eq!(disassemble(&a(Opcode::Move)), "mov [0x0010] -> [0x0012]");
    assert_eq!(
        disassemble(&a(Opcode::DivModAlt)),
        "divmod [0x0010], [0x0011] -> [0x0012]"
    );
    assert_eq!(disassemble(&a(Opcode::Jump)), "jmp 0x0012");
    assert_eq!(
        disassemble(&a(Opcode::JumpNe)),
        "jne [0x0010] != [0x0011] ? 0x0012"
    );
}
