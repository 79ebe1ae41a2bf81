//! Execution engine.
//!
//! Executes exactly one instruction against a run's cell values. A step:
//! 1. **Resolves operands:** Looks up every cell the opcode reads or writes; a missing
//!    cell faults before anything is written.
//! 2. **Dispatches:** Applies the opcode family's effect to the cells.
//! 3. **Computes the next PC:** Fallthrough (start + width) or the jump target.
//! 4. **Locates:** Resolves the next PC to an instruction index; a locator failure
//!    becomes the step's fault.

/// Integer arithmetic on cell values.
pub mod alu;

use crate::common::{Addr, Fault};
use crate::isa::{Family, Instruction};
use crate::program::{Memory, Program, locator};

use alu::AluOp;

/// Result of a successful step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The halt instruction ran; the program finished successfully.
    Halt,
    /// Execution continues at instruction `index`, which starts at `pc`.
    Continue {
        /// Index of the next instruction.
        index: usize,
        /// Address of the next instruction.
        pc: Addr,
        /// `true` if the program counter was redirected by a jump.
        jumped: bool,
    },
}

/// Columns of the cells an instruction touches, resolved before dispatch.
#[derive(Clone, Copy, Debug, Default)]
struct Operands {
    dest: Option<usize>,
    src1: Option<usize>,
    src2: Option<usize>,
}

impl Operands {
    /// Resolves destination, then source 1, then source 2.
    fn resolve(program: &Program, inst: &Instruction) -> Result<Self, Fault> {
        let uses = inst.opcode.operand_use();
        let lookup = |wanted: bool, addr: Addr| -> Result<Option<usize>, Fault> {
            if !wanted {
                return Ok(None);
            }
            program
                .column_of(addr)
                .map(Some)
                .ok_or(Fault::UndefinedCell(addr))
        };
        Ok(Self {
            dest: lookup(uses.dest, inst.arg3)?,
            src1: lookup(uses.src1, inst.arg1)?,
            src2: lookup(uses.src2, inst.arg2)?,
        })
    }
}

/// Reads a resolved operand. Only called for operands the opcode declares.
fn read(memory: &Memory, col: Option<usize>) -> i32 {
    col.map_or(0, |c| memory.get(c))
}

/// Executes the instruction at `index`.
///
/// # Arguments
///
/// * `program` - The loaded program.
/// * `memory` - The run's cell values; mutated in place.
/// * `index` - Index of the instruction to execute.
///
/// # Errors
///
/// * [`Fault::UndefinedCell`] if an operand names an undeclared cell (nothing is written).
/// * [`Fault::DivisionByZero`] for a divide with a zero divisor (nothing is written).
/// * [`Fault::NoInstruction`] / [`Fault::ForcedTermination`] if the next PC does not
///   land on an instruction. Writes made by this step remain in `memory`.
/// * [`Fault::ForcedTermination`] at the end address if `index` has no instruction.
pub fn execute(program: &Program, memory: &mut Memory, index: usize) -> Result<Step, Fault> {
    // Only an empty program hands the engine an index with no instruction.
    let (Some(inst), Some(pc)) = (program.instruction(index), program.address_of(index)) else {
        return Err(Fault::ForcedTermination(program.end()));
    };

    let ops = Operands::resolve(program, inst)?;
    let a = read(memory, ops.src1);
    let b = read(memory, ops.src2);

    let mut target = None;
    match inst.opcode.family() {
        Family::Halt => return Ok(Step::Halt),
        Family::Move => write(memory, ops.dest, a),
        Family::Add => write(memory, ops.dest, alu::execute(AluOp::Add, a, b)),
        Family::Sub => write(memory, ops.dest, alu::execute(AluOp::Sub, a, b)),
        Family::Mul => write(memory, ops.dest, alu::execute(AluOp::Mul, a, b)),
        Family::DivMod => {
            let (q, r) = alu::divmod(a, b)?;
            write(memory, ops.dest, q);
            let rem = inst.arg3.next().and_then(|addr| program.column_of(addr));
            write(memory, rem, r);
        }
        Family::Jump => target = Some(inst.arg3),
        Family::Branch(cond) => {
            if cond.holds(a, b) {
                target = Some(inst.arg3);
            }
        }
    }

    let jumped = target.is_some();
    let next = match target {
        Some(t) => t,
        // The loader keeps every instruction end below the top of memory.
        None => Addr((pc.wide() + u32::from(inst.width)) as u16),
    };

    let index = locator::resolve(program, next)?;
    Ok(Step::Continue {
        index,
        pc: next,
        jumped,
    })
}

fn write(memory: &mut Memory, col: Option<usize>, value: i32) {
    if let Some(c) = col {
        memory.set(c, value);
    }
}
