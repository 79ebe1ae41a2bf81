//! Opcode table.
//!
//! Every code the loader accepts has its own variant, including the alternate
//! codes that share semantics with a primary one (for example `0x03` and `0x13`
//! both multiply). Execution dispatches on [`Family`], so aliases behave
//! identically while still keeping their own code.

use std::fmt;

/// One of the 19 defined instruction codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `0x99`: stop the run successfully.
    Halt,
    /// `0x00`: copy operand1 into operand3.
    Move,
    /// `0x01`: operand3 = operand1 + operand2.
    Add,
    /// `0x02`: operand3 = operand1 - operand2.
    Sub,
    /// `0x03`: operand3 = operand1 * operand2.
    Mul,
    /// `0x13`: alternate code for [`Opcode::Mul`].
    MulAlt,
    /// `0x04`: quotient into operand3, remainder into operand3 + 1.
    DivMod,
    /// `0x14`: alternate code for [`Opcode::DivMod`].
    DivModAlt,
    /// `0x80`: jump to operand3.
    Jump,
    /// `0x81`: jump if operand1 == operand2.
    JumpEq,
    /// `0x82`: jump if operand1 != operand2.
    JumpNe,
    /// `0x83`: jump if operand1 < operand2.
    JumpLt,
    /// `0x93`: alternate code for [`Opcode::JumpLt`].
    JumpLtAlt,
    /// `0x84`: jump if operand1 >= operand2.
    JumpGe,
    /// `0x94`: alternate code for [`Opcode::JumpGe`].
    JumpGeAlt,
    /// `0x85`: jump if operand1 > operand2.
    JumpGt,
    /// `0x95`: alternate code for [`Opcode::JumpGt`].
    JumpGtAlt,
    /// `0x86`: jump if operand1 <= operand2.
    JumpLe,
    /// `0x96`: alternate code for [`Opcode::JumpLe`].
    JumpLeAlt,
}

/// Comparison tested by a conditional jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// `a < b`
    Lt,
    /// `a >= b`
    Ge,
    /// `a > b`
    Gt,
    /// `a <= b`
    Le,
}

impl Condition {
    /// Evaluates the comparison on two cell values.
    pub const fn holds(self, a: i32, b: i32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => a < b,
            Self::Ge => a >= b,
            Self::Gt => a > b,
            Self::Le => a <= b,
        }
    }

    /// Short operator symbol used by the disassembler.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Le => "<=",
        }
    }
}

/// Semantic family an opcode belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Successful termination.
    Halt,
    /// `dest = src1`.
    Move,
    /// `dest = src1 + src2`.
    Add,
    /// `dest = src1 - src2`.
    Sub,
    /// `dest = src1 * src2`.
    Mul,
    /// Truncating quotient with optional remainder cell.
    DivMod,
    /// Unconditional jump.
    Jump,
    /// Jump when the condition holds, fall through otherwise.
    Branch(Condition),
}

/// Operands an opcode reads from the cell map, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandUse {
    /// operand3 names a destination cell.
    pub dest: bool,
    /// operand1 names a source cell.
    pub src1: bool,
    /// operand2 names a source cell.
    pub src2: bool,
}

impl Opcode {
    /// Every defined opcode, in the order the loader's whitelist lists them.
    pub const ALL: [Self; 19] = [
        Self::Halt,
        Self::Move,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::MulAlt,
        Self::DivMod,
        Self::DivModAlt,
        Self::Jump,
        Self::JumpEq,
        Self::JumpNe,
        Self::JumpLt,
        Self::JumpLtAlt,
        Self::JumpGe,
        Self::JumpGeAlt,
        Self::JumpGt,
        Self::JumpGtAlt,
        Self::JumpLe,
        Self::JumpLeAlt,
    ];

    /// Looks up the opcode for a raw code, or `None` if the code is undefined.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Returns the raw code of this opcode.
    pub const fn code(self) -> u8 {
        match self {
            Self::Halt => 0x99,
            Self::Move => 0x00,
            Self::Add => 0x01,
            Self::Sub => 0x02,
            Self::Mul => 0x03,
            Self::MulAlt => 0x13,
            Self::DivMod => 0x04,
            Self::DivModAlt => 0x14,
            Self::Jump => 0x80,
            Self::JumpEq => 0x81,
            Self::JumpNe => 0x82,
            Self::JumpLt => 0x83,
            Self::JumpLtAlt => 0x93,
            Self::JumpGe => 0x84,
            Self::JumpGeAlt => 0x94,
            Self::JumpGt => 0x85,
            Self::JumpGtAlt => 0x95,
            Self::JumpLe => 0x86,
            Self::JumpLeAlt => 0x96,
        }
    }

    /// Returns the semantic family used for dispatch.
    pub const fn family(self) -> Family {
        match self {
            Self::Halt => Family::Halt,
            Self::Move => Family::Move,
            Self::Add => Family::Add,
            Self::Sub => Family::Sub,
            Self::Mul | Self::MulAlt => Family::Mul,
            Self::DivMod | Self::DivModAlt => Family::DivMod,
            Self::Jump => Family::Jump,
            Self::JumpEq => Family::Branch(Condition::Eq),
            Self::JumpNe => Family::Branch(Condition::Ne),
            Self::JumpLt | Self::JumpLtAlt => Family::Branch(Condition::Lt),
            Self::JumpGe | Self::JumpGeAlt => Family::Branch(Condition::Ge),
            Self::JumpGt | Self::JumpGtAlt => Family::Branch(Condition::Gt),
            Self::JumpLe | Self::JumpLeAlt => Family::Branch(Condition::Le),
        }
    }

    /// Returns which operands must resolve to declared cells before execution.
    pub const fn operand_use(self) -> OperandUse {
        match self.family() {
            Family::Halt | Family::Jump => OperandUse {
                dest: false,
                src1: false,
                src2: false,
            },
            Family::Move => OperandUse {
                dest: true,
                src1: true,
                src2: false,
            },
            Family::Add | Family::Sub | Family::Mul | Family::DivMod => OperandUse {
                dest: true,
                src1: true,
                src2: true,
            },
            Family::Branch(_) => OperandUse {
                dest: false,
                src1: true,
                src2: true,
            },
        }
    }

    /// Lowercase mnemonic used in listings and trace logs.
    pub const fn mnemonic(self) -> &'static str {
        match self.family() {
            Family::Halt => "halt",
            Family::Move => "mov",
            Family::Add => "add",
            Family::Sub => "sub",
            Family::Mul => "mul",
            Family::DivMod => "divmod",
            Family::Jump => "jmp",
            Family::Branch(Condition::Eq) => "jeq",
            Family::Branch(Condition::Ne) => "jne",
            Family::Branch(Condition::Lt) => "jlt",
            Family::Branch(Condition::Ge) => "jge",
            Family::Branch(Condition::Gt) => "jgt",
            Family::Branch(Condition::Le) => "jle",
        }
    }

    /// Returns `true` for opcodes that may redirect the program counter.
    pub const fn is_jump(self) -> bool {
        matches!(self.family(), Family::Jump | Family::Branch(_))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.code())
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}
